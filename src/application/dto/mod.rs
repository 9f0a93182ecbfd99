//! Data Transfer Objects - For storage and API boundaries
//!
//! DTOs live in the application layer so infrastructure (HTTP, document
//! stores) can serialize without knowing the domain internals.

pub mod rate_documents;
pub mod status;

pub use rate_documents::{BaselineDocument, DerivedDocument, BASELINE_DOCUMENT, DERIVED_DOCUMENT};
pub use status::{CommandState, ControllerStatus, LifecycleState, SyncReport, TableSummary};
