//! Split consistency checks.
//!
//! The balance calculator trusts manual splits as given. Callers that accept
//! new expenses gate them with these functions first.

use crate::core::error::SplitError;
use crate::core::expense::{Expense, SplitPolicy};
use crate::core::money::EPSILON;
use rust_decimal::Decimal;

/// Do `splits` add up to `total` within one cent?
///
/// ```
/// use split_engine::balance::validation::splits_match_total;
/// use rust_decimal_macros::dec;
///
/// assert!(splits_match_total(&[dec!(60), dec!(40)], dec!(100)));
/// assert!(!splits_match_total(&[dec!(40), dec!(40)], dec!(100)));
/// ```
pub fn splits_match_total(splits: &[Decimal], total: Decimal) -> bool {
    splits_match_total_within(splits, total, EPSILON)
}

/// Same as [`splits_match_total`] with an explicit tolerance. The comparison
/// is strict: a discrepancy of exactly `epsilon` does not match.
pub fn splits_match_total_within(splits: &[Decimal], total: Decimal, epsilon: Decimal) -> bool {
    let allocated: Decimal = splits.iter().sum();
    (allocated - total).abs() < epsilon
}

/// `sum(splits) - total` for an expense. Zero for equal-split expenses.
pub fn split_discrepancy(expense: &Expense) -> Decimal {
    match expense.policy() {
        SplitPolicy::Equal => Decimal::ZERO,
        SplitPolicy::Manual => expense.allocated() - expense.amount(),
    }
}

/// Check a manual-split expense before accepting it.
///
/// Rejects non-positive totals, negative shares, and splits that do not sum
/// to the total within `epsilon`. Equal-split expenses only get the total
/// check.
pub fn validate_manual_expense(expense: &Expense, epsilon: Decimal) -> Result<(), SplitError> {
    if expense.amount() <= Decimal::ZERO {
        return Err(SplitError::InvalidAmount {
            expense: expense.id().clone(),
            amount: expense.amount(),
        });
    }
    if expense.policy() == SplitPolicy::Equal {
        return Ok(());
    }

    let mut shares = Vec::with_capacity(expense.splits().len());
    for split in expense.splits() {
        if split.amount() < Decimal::ZERO {
            return Err(SplitError::InvalidAmount {
                expense: expense.id().clone(),
                amount: split.amount(),
            });
        }
        shares.push(split.amount());
    }

    if !splits_match_total_within(&shares, expense.amount(), epsilon) {
        return Err(SplitError::SplitMismatch {
            expense: expense.id().clone(),
            total: expense.amount(),
            allocated: expense.allocated(),
        });
    }
    Ok(())
}
