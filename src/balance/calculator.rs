use crate::balance::validation::split_discrepancy;
use crate::core::error::SplitError;
use crate::core::expense::{Expense, SplitPolicy};
use crate::core::ledger::{Balance, Ledger};
use crate::core::member::Member;
use crate::core::money::SplitConfig;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Turns a group's members and expenses into one net balance per member.
///
/// For every expense the payer is credited the full amount and each member
/// who owes a share is debited that share:
///
/// - **equal** split: every member of the group, payer included, owes
///   `amount / N`.
/// - **manual** split: each split row's member owes the row's amount.
///
/// Expenses are applied independently, so their order does not affect the
/// result. The calculator is pure and holds no state beyond its config.
///
/// # Examples
///
/// ```
/// use split_engine::balance::calculator::BalanceCalculator;
/// use split_engine::core::expense::{Expense, GroupId};
/// use split_engine::core::member::{Member, MemberId};
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let members = vec![Member::new("a", "A"), Member::new("b", "B"), Member::new("c", "C")];
/// let expenses = vec![Expense::equal(
///     GroupId::new("g"),
///     MemberId::new("a"),
///     dec!(300),
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// )];
///
/// let balances = BalanceCalculator::default()
///     .compute_balances(&members, &expenses)
///     .unwrap();
/// assert_eq!(balances[0].amount, dec!(200));
/// assert_eq!(balances[1].amount, dec!(-100));
/// assert_eq!(balances[2].amount, dec!(-100));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BalanceCalculator {
    config: SplitConfig,
}

impl BalanceCalculator {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Compute one balance per member, in member order.
    ///
    /// # Errors
    ///
    /// - [`SplitError::InvalidGroupState`] for an empty or duplicated member list.
    /// - [`SplitError::UnknownMember`] when a payer or split member is not in
    ///   the group.
    /// - [`SplitError::InvalidAmount`] for a non-positive expense total or a
    ///   negative split.
    pub fn compute_balances(
        &self,
        members: &[Member],
        expenses: &[Expense],
    ) -> Result<Vec<Balance>, SplitError> {
        Ok(self.compute_ledger(members, expenses)?.to_balances())
    }

    /// Like [`compute_balances`](Self::compute_balances) but returns the
    /// ledger for further queries.
    pub fn compute_ledger(
        &self,
        members: &[Member],
        expenses: &[Expense],
    ) -> Result<Ledger, SplitError> {
        if members.is_empty() {
            return Err(SplitError::InvalidGroupState {
                reason: "group has no members".to_string(),
            });
        }

        let mut ledger = Ledger::open(members.iter().map(Member::id));
        if ledger.len() != members.len() {
            let mut seen = HashSet::new();
            let duplicate = members
                .iter()
                .map(Member::id)
                .find(|id| !seen.insert(*id))
                .map(|id| id.to_string())
                .unwrap_or_default();
            return Err(SplitError::InvalidGroupState {
                reason: format!("duplicate member {}", duplicate),
            });
        }

        let head_count = Decimal::from(members.len());
        for expense in expenses {
            if expense.amount() <= Decimal::ZERO {
                return Err(SplitError::InvalidAmount {
                    expense: expense.id().clone(),
                    amount: expense.amount(),
                });
            }
            if !ledger.credit(expense.paid_by(), expense.amount()) {
                return Err(SplitError::UnknownMember {
                    expense: expense.id().clone(),
                    member: expense.paid_by().clone(),
                });
            }

            match expense.policy() {
                SplitPolicy::Equal => {
                    let share = expense.amount() / head_count;
                    for member in members {
                        ledger.debit(member.id(), share);
                    }
                }
                SplitPolicy::Manual => self.apply_manual_splits(&mut ledger, expense)?,
            }
        }

        debug!(
            "computed balances for {} members over {} expenses (residual {})",
            members.len(),
            expenses.len(),
            ledger.total()
        );
        Ok(ledger)
    }

    fn apply_manual_splits(&self, ledger: &mut Ledger, expense: &Expense) -> Result<(), SplitError> {
        let discrepancy = split_discrepancy(expense);
        if discrepancy.abs() >= self.config.epsilon {
            warn!(
                "expense {} splits allocate {} of {}; balances will not sum to zero",
                expense.id(),
                expense.allocated(),
                expense.amount()
            );
        }

        for split in expense.splits() {
            if split.amount() < Decimal::ZERO {
                return Err(SplitError::InvalidAmount {
                    expense: expense.id().clone(),
                    amount: split.amount(),
                });
            }
            if !ledger.debit(split.member(), split.amount()) {
                return Err(SplitError::UnknownMember {
                    expense: expense.id().clone(),
                    member: split.member().clone(),
                });
            }
        }
        Ok(())
    }
}

/// [`BalanceCalculator::compute_balances`] with the default config.
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> Result<Vec<Balance>, SplitError> {
    BalanceCalculator::default().compute_balances(members, expenses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::GroupId;
    use crate::core::member::MemberId;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 14).unwrap()
    }

    fn group(names: &[&str]) -> Vec<Member> {
        names
            .iter()
            .map(|n| Member::new(*n, n.to_uppercase()))
            .collect()
    }

    fn equal(payer: &str, amount: Decimal) -> Expense {
        Expense::equal(GroupId::new("g"), MemberId::new(payer), amount, day())
    }

    fn amounts(balances: &[Balance]) -> Vec<Decimal> {
        balances.iter().map(|b| b.amount).collect()
    }

    #[test]
    fn test_single_equal_expense() {
        let balances = compute_balances(&group(&["a", "b", "c"]), &[equal("a", dec!(300))]).unwrap();
        assert_eq!(amounts(&balances), vec![dec!(200), dec!(-100), dec!(-100)]);
    }

    #[test]
    fn test_mutual_expenses_cancel() {
        let balances = compute_balances(
            &group(&["a", "b"]),
            &[equal("a", dec!(100)), equal("b", dec!(100))],
        )
        .unwrap();
        assert_eq!(amounts(&balances), vec![Decimal::ZERO, Decimal::ZERO]);
    }

    #[test]
    fn test_no_expenses_gives_zero_balances() {
        let balances = compute_balances(&group(&["a", "b", "c"]), &[]).unwrap();
        assert_eq!(balances.len(), 3);
        assert!(balances.iter().all(|b| b.amount.is_zero()));
    }

    #[test]
    fn test_uneven_division_conserves_within_epsilon() {
        let members = group(&["a", "b", "c"]);
        let ledger = BalanceCalculator::default()
            .compute_ledger(&members, &[equal("a", dec!(100))])
            .unwrap();
        assert!(ledger.is_balanced(dec!(0.01)));
        assert_eq!(
            SplitConfig::default().round(ledger.position(&MemberId::new("b"))),
            dec!(-33.33)
        );
    }

    #[test]
    fn test_zero_members_is_invalid() {
        let err = compute_balances(&[], &[equal("a", dec!(10))]).unwrap_err();
        assert!(matches!(err, SplitError::InvalidGroupState { .. }));
    }

    #[test]
    fn test_duplicate_members_are_invalid() {
        let err = compute_balances(&group(&["a", "b", "a"]), &[]).unwrap_err();
        match err {
            SplitError::InvalidGroupState { reason } => assert_eq!(reason, "duplicate member a"),
            other => panic!("expected InvalidGroupState, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_payer() {
        let err = compute_balances(&group(&["a", "b"]), &[equal("zed", dec!(10))]).unwrap_err();
        match err {
            SplitError::UnknownMember { member, .. } => assert_eq!(member.as_str(), "zed"),
            other => panic!("expected UnknownMember, got {:?}", other),
        }
    }

    #[test]
    fn test_manual_split_uses_split_rows() {
        let members = group(&["a", "b", "c"]);
        let expense = Expense::manual(
            GroupId::new("g"),
            MemberId::new("a"),
            dec!(100),
            day(),
            [(MemberId::new("b"), dec!(70)), (MemberId::new("c"), dec!(30))],
        );
        let balances = compute_balances(&members, &[expense]).unwrap();
        assert_eq!(amounts(&balances), vec![dec!(100), dec!(-70), dec!(-30)]);
    }

    #[test]
    fn test_manual_split_member_must_belong() {
        let expense = Expense::manual(
            GroupId::new("g"),
            MemberId::new("a"),
            dec!(50),
            day(),
            [(MemberId::new("outsider"), dec!(50))],
        );
        let err = compute_balances(&group(&["a", "b"]), &[expense]).unwrap_err();
        assert!(matches!(err, SplitError::UnknownMember { .. }));
    }

    #[test]
    fn test_manual_split_mismatch_is_not_rejected() {
        let expense = Expense::manual(
            GroupId::new("g"),
            MemberId::new("a"),
            dec!(100),
            day(),
            [(MemberId::new("a"), dec!(40)), (MemberId::new("b"), dec!(40))],
        );
        let ledger = BalanceCalculator::default()
            .compute_ledger(&group(&["a", "b"]), &[expense])
            .unwrap();
        assert_eq!(ledger.total(), dec!(20));
    }

    #[test]
    fn test_expense_order_does_not_matter() {
        let members = group(&["a", "b", "c", "d"]);
        let mut expenses = vec![
            equal("a", dec!(120)),
            equal("b", dec!(48.40)),
            equal("d", dec!(9.99)),
            equal("a", dec!(4)),
        ];
        let forward = compute_balances(&members, &expenses).unwrap();
        expenses.reverse();
        let backward = compute_balances(&members, &expenses).unwrap();

        for (f, b) in forward.iter().zip(&backward) {
            assert_eq!(f.member, b.member);
            assert!((f.amount - b.amount).abs() <= dec!(0.01));
        }
    }
}
