pub mod minimizer;
pub mod plan;
