use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::application::ports::outbound::{DocumentError, DocumentStorePort};

/// Documents stored as JSON text in a single `documents` table
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS documents (
                name TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
        "#).execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl DocumentStorePort for SqliteDocumentStore {
    async fn load_document(&self, name: &str) -> Result<serde_json::Value, DocumentError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT body FROM documents WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?;

        let (body,) = row.ok_or_else(|| DocumentError::NotFound(name.to_string()))?;
        serde_json::from_str(&body).map_err(|e| DocumentError::Serialization(format!("{name}: {e}")))
    }

    async fn save_document(&self, name: &str, document: &serde_json::Value) -> Result<(), DocumentError> {
        let body = serde_json::to_string(document).map_err(|e| DocumentError::Serialization(e.to_string()))?;

        sqlx::query("INSERT OR REPLACE INTO documents (name, body, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)")
            .bind(name)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(|e| DocumentError::Database(e.to_string()))?;

        Ok(())
    }
}
