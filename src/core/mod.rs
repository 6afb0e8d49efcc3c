pub mod error;
pub mod expense;
pub mod ledger;
pub mod member;
pub mod money;
