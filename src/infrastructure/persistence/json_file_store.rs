//! JSON file document store
//!
//! Each document is one pretty-printed `<name>.json` file in the data
//! directory. Writes go to a temporary file first and are renamed into place.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::application::ports::outbound::{DocumentError, DocumentStorePort};

pub struct JsonFileDocumentStore {
    dir: PathBuf,
}

impl JsonFileDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[cfg(test)]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl DocumentStorePort for JsonFileDocumentStore {
    async fn load_document(&self, name: &str) -> Result<serde_json::Value, DocumentError> {
        let path = self.path_for(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DocumentError::NotFound(name.to_string()))
            }
            Err(e) => return Err(DocumentError::Io(format!("{}: {e}", path.display()))),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| DocumentError::Serialization(format!("{}: {e}", path.display())))
    }

    async fn save_document(&self, name: &str, document: &serde_json::Value) -> Result<(), DocumentError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DocumentError::Io(format!("{}: {e}", self.dir.display())))?;

        let json = serde_json::to_vec_pretty(document)
            .map_err(|e| DocumentError::Serialization(e.to_string()))?;

        let path = self.path_for(name);
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, json)
            .await
            .map_err(|e| DocumentError::Io(format!("{}: {e}", staging.display())))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| DocumentError::Io(format!("{}: {e}", path.display())))?;

        tracing::debug!(document = name, path = %path.display(), "Saved document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileDocumentStore::new(dir.path());

        assert_eq!(
            store.load_document("VanillaRates").await,
            Err(DocumentError::NotFound("VanillaRates".to_string()))
        );
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileDocumentStore::new(dir.path().join("nested"));
        let document = serde_json::json!({ "Dispensers": { "wood_node": {} } });

        store.save_document("Rates", &document).await.unwrap();

        assert!(store.dir().join("Rates.json").exists());
        assert!(!store.dir().join("Rates.json.tmp").exists());
        assert_eq!(store.load_document("Rates").await.unwrap(), document);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("Rates.json"), b"{").await.unwrap();
        let store = JsonFileDocumentStore::new(dir.path());

        assert!(matches!(
            store.load_document("Rates").await,
            Err(DocumentError::Serialization(_))
        ));
    }
}
