pub mod snapshot;
pub mod store;
pub mod summary;
