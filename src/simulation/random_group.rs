//! Random group generation for benchmarks, property tests and the CLI.

use crate::core::expense::{Expense, GroupId};
use crate::core::member::{Member, MemberId};
use crate::group::snapshot::GroupSnapshot;
use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of members in the group.
    pub member_count: usize,
    /// Number of expenses to log.
    pub expense_count: usize,
    /// Fraction of expenses split manually instead of equally, in `[0, 1]`.
    pub manual_ratio: f64,
    /// Smallest expense, in cents.
    pub min_cents: i64,
    /// Largest expense, in cents.
    pub max_cents: i64,
    /// Date of the first expense; later ones follow daily.
    pub start_date: NaiveDate,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            member_count: 5,
            expense_count: 20,
            manual_ratio: 0.25,
            min_cents: 100,
            max_cents: 50_000,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

/// Generate a random group snapshot.
///
/// Manual-split expenses always carry splits that sum exactly to the total,
/// so the generated group is conservation-consistent.
pub fn generate_random_group(config: &GroupConfig) -> GroupSnapshot {
    let mut rng = rand::thread_rng();
    let group_id = GroupId::new(format!("GROUP-{:04}", rng.gen_range(0..10_000)));

    let members: Vec<Member> = (0..config.member_count.max(1))
        .map(|i| Member::new(format!("M-{:03}", i), format!("Member {}", i + 1)))
        .collect();

    let min = config.min_cents.max(1);
    let max = config.max_cents.max(min + 1);

    let mut expenses = Vec::with_capacity(config.expense_count);
    for n in 0..config.expense_count {
        let payer = members[rng.gen_range(0..members.len())].id().clone();
        let cents = rng.gen_range(min..max);
        let amount = Decimal::new(cents, 2);
        let date = config.start_date + Duration::days(n as i64);

        let expense = if rng.gen_bool(config.manual_ratio.clamp(0.0, 1.0)) {
            let shares = random_shares(&mut rng, &members, cents);
            Expense::manual(group_id.clone(), payer, amount, date, shares)
        } else {
            Expense::equal(group_id.clone(), payer, amount, date)
        };
        expenses.push(expense.with_description(format!("Expense #{}", n + 1)));
    }

    GroupSnapshot::new(group_id, members, expenses)
}

/// Divide `cents` among a random non-empty subset of `members`.
fn random_shares<R: Rng>(rng: &mut R, members: &[Member], cents: i64) -> Vec<(MemberId, Decimal)> {
    let mut participants: Vec<&MemberId> = members
        .iter()
        .map(Member::id)
        .filter(|_| rng.gen_bool(0.6))
        .collect();
    if participants.is_empty() {
        participants.push(members[rng.gen_range(0..members.len())].id());
    }

    let mut remaining = cents;
    let mut shares = Vec::with_capacity(participants.len());
    let last = participants.len() - 1;
    for (i, member) in participants.into_iter().enumerate() {
        let share = if i == last {
            remaining
        } else {
            rng.gen_range(0..=remaining)
        };
        remaining -= share;
        shares.push((member.clone(), Decimal::new(share, 2)));
    }
    shares
}
