//! In-memory document store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{DocumentError, DocumentStorePort};

/// Documents kept in process memory; lost on restart
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStorePort for InMemoryDocumentStore {
    async fn load_document(&self, name: &str) -> Result<serde_json::Value, DocumentError> {
        self.documents
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| DocumentError::NotFound(name.to_string()))
    }

    async fn save_document(&self, name: &str, document: &serde_json::Value) -> Result<(), DocumentError> {
        self.documents
            .write()
            .await
            .insert(name.to_string(), document.clone());
        Ok(())
    }
}
