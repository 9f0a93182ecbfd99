//! Outbound ports - Interfaces that the application requires from external systems

mod document_store_port;
mod entity_source_port;
mod permission_port;

pub use document_store_port::{DocumentError, DocumentStorePort};
pub use entity_source_port::{EntitySourcePort, LiveDispenser};
pub use permission_port::{PermissionRegistryPort, ADMIN_PERMISSION};
