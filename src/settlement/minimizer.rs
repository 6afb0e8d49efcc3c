use crate::core::error::SplitError;
use crate::core::ledger::Balance;
use crate::core::member::MemberId;
use crate::core::money::SplitConfig;
use crate::settlement::plan::{Settlement, SettlementPlan};
use log::{debug, trace, warn};
use rust_decimal::Decimal;

/// Reduces net balances to a short list of pairwise payments.
///
/// # Algorithm
///
/// Greedy largest-debtor / largest-creditor matching:
///
/// 1. Drop balances within epsilon of zero.
/// 2. Round the rest to minor units with largest-remainder apportionment, so
///    the rounded balances sum to exactly zero. Members whose rounding error
///    is largest absorb the leftover units.
/// 3. Split into debtors (negative) and creditors (positive). Order debtors
///    most-negative first and creditors largest first. Equal amounts are
///    ordered by member ID so the output is deterministic.
/// 4. Walk both lists with one cursor each. Each step pays
///    `min(|debt|, credit)` from the current debtor to the current creditor
///    and moves every cursor whose working balance fell within epsilon.
///    Equal magnitudes clear both sides in one payment.
/// 5. Stop when either list runs out.
///
/// Input whose balances do not sum to zero within epsilon is rejected up
/// front with [`SplitError::UnbalancedLedger`].
///
/// Matching runs in exact minor units, so for ordinary calculator output
/// every member ends less than one minor unit from zero once the plan is
/// applied. Every step advances at least one cursor, so the plan has at most
/// `#debtors + #creditors - 1` payments.
///
/// # Sub-epsilon balances
///
/// Dropped balances are not matched. When they add up to more than epsilon,
/// their sum lands on the members that are matched. For example `a = 0.05`
/// against five members at `-0.01` yields an empty plan and leaves `a` at
/// `0.05`. Such a ledger still sums to zero, so it is not reported as
/// unbalanced; the leftover is logged at debug level.
///
/// # Examples
///
/// ```
/// use split_engine::core::ledger::Balance;
/// use split_engine::core::member::MemberId;
/// use split_engine::settlement::minimizer::SettlementMinimizer;
/// use rust_decimal_macros::dec;
///
/// let balances = vec![
///     Balance::new(MemberId::new("a"), dec!(200)),
///     Balance::new(MemberId::new("b"), dec!(-100)),
///     Balance::new(MemberId::new("c"), dec!(-100)),
/// ];
///
/// let plan = SettlementMinimizer::default().minimize(&balances).unwrap();
/// assert_eq!(plan.len(), 2);
/// assert!(plan.settlements().iter().all(|s| s.to == MemberId::new("a")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettlementMinimizer {
    config: SplitConfig,
}

/// A member's balance before and after rounding to minor units.
struct Share<'a> {
    member: &'a MemberId,
    exact: Decimal,
    rounded: Decimal,
}

/// A member with a working balance magnitude during matching.
struct Position<'a> {
    member: &'a MemberId,
    remaining: Decimal,
}

impl SettlementMinimizer {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Compute the settlement list for `balances`.
    pub fn compute_settlements(&self, balances: &[Balance]) -> Result<Vec<Settlement>, SplitError> {
        self.minimize(balances).map(SettlementPlan::into_settlements)
    }

    /// Compute settlements and wrap them with summary figures.
    pub fn minimize(&self, balances: &[Balance]) -> Result<SettlementPlan, SplitError> {
        self.config.validate()?;
        let epsilon = self.config.epsilon;

        let total: Decimal = balances.iter().map(|b| b.amount).sum();
        if total.abs() > epsilon {
            warn!(
                "balances of {} members sum to {}, refusing to settle",
                balances.len(),
                total
            );
            return Err(SplitError::UnbalancedLedger {
                residual: total.abs(),
            });
        }

        let shares = self.apportion(balances);
        let gross_debt: Decimal = shares
            .iter()
            .filter(|s| s.exact < Decimal::ZERO)
            .map(|s| -s.exact)
            .sum();

        let mut debtors: Vec<Position<'_>> = shares
            .iter()
            .filter(|s| s.rounded < Decimal::ZERO)
            .map(|s| Position {
                member: s.member,
                remaining: -s.rounded,
            })
            .collect();
        let mut creditors: Vec<Position<'_>> = shares
            .iter()
            .filter(|s| s.rounded > Decimal::ZERO)
            .map(|s| Position {
                member: s.member,
                remaining: s.rounded,
            })
            .collect();

        // Largest magnitude first on both sides.
        debtors.sort_by(|x, y| {
            y.remaining
                .cmp(&x.remaining)
                .then_with(|| x.member.cmp(y.member))
        });
        creditors.sort_by(|x, y| {
            y.remaining
                .cmp(&x.remaining)
                .then_with(|| x.member.cmp(y.member))
        });

        let max_steps = debtors.len() + creditors.len();
        let mut settlements = Vec::new();
        let (mut i, mut j) = (0, 0);
        let mut steps = 0;

        while i < debtors.len() && j < creditors.len() && steps < max_steps {
            steps += 1;
            let debtor = &debtors[i];
            let creditor = &creditors[j];
            let amount = debtor.remaining.min(creditor.remaining);

            if amount > epsilon {
                trace!(
                    "step {}: {} pays {} {}",
                    steps,
                    debtor.member,
                    creditor.member,
                    amount
                );
                settlements.push(Settlement {
                    from: debtor.member.clone(),
                    to: creditor.member.clone(),
                    amount,
                });
            }

            debtors[i].remaining -= amount;
            creditors[j].remaining -= amount;

            if debtors[i].remaining <= epsilon {
                i += 1;
            }
            if creditors[j].remaining <= epsilon {
                j += 1;
            }
        }

        let unmatched: Decimal = debtors[i..]
            .iter()
            .chain(&creditors[j..])
            .map(|p| p.remaining)
            .sum();
        if unmatched > Decimal::ZERO {
            debug!("{} below epsilon left unallocated", unmatched);
        }

        debug!(
            "settled {} debtors and {} creditors with {} payments",
            debtors.len(),
            creditors.len(),
            settlements.len()
        );
        Ok(SettlementPlan::new(settlements, gross_debt))
    }

    /// Round the non-negligible balances to minor units so that they sum to
    /// exactly zero.
    fn apportion<'a>(&self, balances: &'a [Balance]) -> Vec<Share<'a>> {
        let mut shares: Vec<Share<'a>> = balances
            .iter()
            .filter(|b| !self.config.is_negligible(b.amount))
            .map(|b| Share {
                member: &b.member,
                exact: b.amount,
                rounded: self.config.round(b.amount),
            })
            .collect();
        if shares.is_empty() {
            return shares;
        }

        // Always a whole number of units.
        let mut gap: Decimal = -shares.iter().map(|s| s.rounded).sum::<Decimal>();
        if gap.is_zero() {
            return shares;
        }

        let dropped = shares.len() < balances.len();
        let step = if gap > Decimal::ZERO {
            self.config.unit()
        } else {
            -self.config.unit()
        };

        // Rounded down the most first when adding, rounded up the most first
        // when taking away.
        let mut order: Vec<usize> = (0..shares.len()).collect();
        order.sort_by(|&x, &y| {
            let ex = shares[x].exact - shares[x].rounded;
            let ey = shares[y].exact - shares[y].rounded;
            let by_error = if step > Decimal::ZERO {
                ey.cmp(&ex)
            } else {
                ex.cmp(&ey)
            };
            by_error.then_with(|| shares[x].member.cmp(shares[y].member))
        });

        for &idx in order.iter().cycle() {
            if gap.is_zero() {
                break;
            }
            shares[idx].rounded += step;
            gap -= step;
        }

        if dropped {
            debug!(
                "absorbed {} of dropped sub-epsilon balances into {} members",
                balances.len() - shares.len(),
                shares.len()
            );
        }
        shares
    }
}

/// [`SettlementMinimizer::compute_settlements`] with the default config.
pub fn compute_settlements(balances: &[Balance]) -> Result<Vec<Settlement>, SplitError> {
    SettlementMinimizer::default().compute_settlements(balances)
}
