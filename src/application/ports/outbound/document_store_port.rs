//! Document store port - durable storage for structured documents
//!
//! Documents are opaque JSON values addressed by name. The store does not
//! know what a rate table is; encoding lives in the application layer.

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    /// Nothing has been saved under this name yet
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Storage I/O error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Database error: {0}")]
    Database(String),
}

impl DocumentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentError::NotFound(_))
    }
}

#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    async fn load_document(&self, name: &str) -> Result<serde_json::Value, DocumentError>;
    async fn save_document(&self, name: &str, document: &serde_json::Value) -> Result<(), DocumentError>;
}
