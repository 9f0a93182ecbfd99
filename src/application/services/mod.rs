//! Application services - Use case implementations
//!
//! The rate controller is the entry point; the other services are the pieces
//! it composes: loading and saving rate documents, joining the startup loads
//! and pushing rate tables onto live dispensers.

pub mod load_coordinator;
pub mod rate_controller;
pub mod rate_repository;
pub mod sync_service;

#[cfg(test)]
pub(crate) mod test_doubles;

pub use rate_controller::RateController;
pub use rate_repository::RateRepository;
