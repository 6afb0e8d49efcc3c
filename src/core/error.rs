use crate::core::expense::ExpenseId;
use crate::core::member::MemberId;
use crate::group::store::StoreError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by balance and settlement computations.
///
/// None of these are retried inside the engine. Every variant is terminal
/// for the current computation.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("invalid group state: {reason}")]
    InvalidGroupState { reason: String },

    #[error("expense {expense} references {member}, who is not a member of the group")]
    UnknownMember { expense: ExpenseId, member: MemberId },

    #[error("expense {expense} has invalid amount {amount}")]
    InvalidAmount { expense: ExpenseId, amount: Decimal },

    #[error("manual splits of expense {expense} allocate {allocated} of {total}")]
    SplitMismatch {
        expense: ExpenseId,
        total: Decimal,
        allocated: Decimal,
    },

    #[error("balances do not sum to zero: {residual} left unmatched")]
    UnbalancedLedger { residual: Decimal },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
