pub mod calculator;
pub mod validation;
