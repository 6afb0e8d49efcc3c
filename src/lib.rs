//! # split-engine
//!
//! Balance and settlement engine for shared group expenses.
//!
//! Given a group's members and the expenses they logged, this engine
//! computes each member's net balance and reduces those balances to a short
//! list of payments that settles everyone up.
//!
//! ## Architecture
//!
//! - **core**: Foundational types: members, expenses, splits, ledger, money settings, errors
//! - **balance**: Balance calculator and split validation
//! - **settlement**: Greedy settlement minimizer and settlement plans
//! - **group**: Group snapshots, the store port, and per-group summaries
//! - **simulation**: Random group generation for testing and benchmarks

pub mod balance;
pub mod core;
pub mod group;
pub mod settlement;
pub mod simulation;

pub use crate::balance::calculator::compute_balances;
pub use crate::settlement::minimizer::compute_settlements;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::balance::calculator::{compute_balances, BalanceCalculator};
    pub use crate::balance::validation::splits_match_total;
    pub use crate::core::error::SplitError;
    pub use crate::core::expense::{Expense, ExpenseId, ExpenseSplit, GroupId, SplitPolicy};
    pub use crate::core::ledger::{Balance, Ledger};
    pub use crate::core::member::{Member, MemberId};
    pub use crate::core::money::SplitConfig;
    pub use crate::group::snapshot::GroupSnapshot;
    pub use crate::group::store::{GroupStore, InMemoryGroupStore};
    pub use crate::group::summary::GroupSummary;
    pub use crate::settlement::minimizer::{compute_settlements, SettlementMinimizer};
    pub use crate::settlement::plan::{apply_settlements, Settlement, SettlementPlan};
}
