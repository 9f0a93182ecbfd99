//! Aggregates - Cluster of domain objects treated as a single unit

pub mod baseline_store;
pub mod derived_store;
pub mod rate_book;

pub use baseline_store::BaselineStore;
pub use derived_store::DerivedStore;
pub use rate_book::RateBook;
