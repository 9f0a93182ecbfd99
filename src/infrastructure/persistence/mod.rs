//! Document store adapters
//!
//! Implementations of `DocumentStorePort` for each supported backend, plus
//! the factory that picks one from configuration.

mod factory;
mod json_file_store;
mod memory_document_store;
mod sqlite_document_store;

pub use factory::DocumentStoreFactory;
pub use json_file_store::JsonFileDocumentStore;
pub use memory_document_store::InMemoryDocumentStore;
pub use sqlite_document_store::SqliteDocumentStore;
