//! Document store factory - Creates the configured storage backend
//!
//! Backends are wrapped in an enum so the choice is made once at startup
//! while callers only see `DocumentStorePort`.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

use crate::application::ports::outbound::{DocumentError, DocumentStorePort};
use crate::infrastructure::config::{AppConfig, StoreBackend};
use crate::infrastructure::persistence::{InMemoryDocumentStore, JsonFileDocumentStore, SqliteDocumentStore};

/// Enum wrapper for document store backends to enable runtime selection
pub enum DocumentStoreBackendEnum {
    Memory(InMemoryDocumentStore),
    File(JsonFileDocumentStore),
    Sqlite(SqliteDocumentStore),
}

#[async_trait]
impl DocumentStorePort for DocumentStoreBackendEnum {
    async fn load_document(&self, name: &str) -> Result<serde_json::Value, DocumentError> {
        match self {
            DocumentStoreBackendEnum::Memory(s) => s.load_document(name).await,
            DocumentStoreBackendEnum::File(s) => s.load_document(name).await,
            DocumentStoreBackendEnum::Sqlite(s) => s.load_document(name).await,
        }
    }

    async fn save_document(&self, name: &str, document: &serde_json::Value) -> Result<(), DocumentError> {
        match self {
            DocumentStoreBackendEnum::Memory(s) => s.save_document(name, document).await,
            DocumentStoreBackendEnum::File(s) => s.save_document(name, document).await,
            DocumentStoreBackendEnum::Sqlite(s) => s.save_document(name, document).await,
        }
    }
}

/// Document store factory
pub struct DocumentStoreFactory {
    config: AppConfig,
}

impl DocumentStoreFactory {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Create the backend named by `YIELDKEEPER_STORE_BACKEND`
    pub async fn create(&self) -> Result<Arc<DocumentStoreBackendEnum>> {
        let backend = match self.config.store_backend {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory document store, rates will not survive a restart");
                DocumentStoreBackendEnum::Memory(InMemoryDocumentStore::new())
            }
            StoreBackend::File => {
                tracing::info!("Storing rate documents in {}", self.config.data_dir.display());
                DocumentStoreBackendEnum::File(JsonFileDocumentStore::new(&self.config.data_dir))
            }
            StoreBackend::Sqlite => {
                let path = &self.config.sqlite_path;
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create document database directory")?;
                }

                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                let pool = SqlitePool::connect_with(options)
                    .await
                    .context("Failed to connect to SQLite document database")?;
                tracing::info!("Connected to SQLite document database: {}", path.display());

                let store = SqliteDocumentStore::new(pool)
                    .await
                    .context("Failed to initialize documents table")?;
                DocumentStoreBackendEnum::Sqlite(store)
            }
        };
        Ok(Arc::new(backend))
    }
}
