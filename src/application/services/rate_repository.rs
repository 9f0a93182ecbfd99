//! Rate Repository - Encodes rate tables into persisted documents

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::application::dto::{BaselineDocument, DerivedDocument, BASELINE_DOCUMENT, DERIVED_DOCUMENT};
use crate::application::ports::outbound::{DocumentError, DocumentStorePort};
use crate::domain::value_objects::{RateTable, RuleSnapshot};

/// Reads and writes the baseline and derived documents.
///
/// A missing document is never an error here: it comes back as empty data.
#[derive(Clone)]
pub struct RateRepository {
    store: Arc<dyn DocumentStorePort>,
}

impl RateRepository {
    pub fn new(store: Arc<dyn DocumentStorePort>) -> Self {
        Self { store }
    }

    async fn load<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<Option<T>, DocumentError> {
        let value = match self.store.load_document(name).await {
            Ok(value) => value,
            Err(e) if e.is_not_found() => {
                debug!(document = name, "No saved document");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DocumentError::Serialization(format!("{name}: {e}")))
    }

    async fn save<T: serde::Serialize>(&self, name: &str, document: &T) -> Result<(), DocumentError> {
        let value = serde_json::to_value(document)
            .map_err(|e| DocumentError::Serialization(format!("{name}: {e}")))?;
        self.store.save_document(name, &value).await
    }

    /// Load the baseline table, empty on first run
    #[instrument(skip(self))]
    pub async fn load_baseline(&self) -> Result<RateTable, DocumentError> {
        let Some(document) = self.load::<BaselineDocument>(BASELINE_DOCUMENT).await? else {
            return Ok(RateTable::new());
        };
        if document.dispensers.is_empty() {
            warn!("Saved baseline contains no dispensers, capturing from live dispensers instead");
        }
        Ok(document.dispensers)
    }

    /// Load the derived table together with the rules it was derived with.
    ///
    /// Documents without an embedded rule snapshot cannot be trusted and are
    /// treated as missing.
    #[instrument(skip(self))]
    pub async fn load_derived(&self) -> Result<Option<(RateTable, RuleSnapshot)>, DocumentError> {
        let Some(document) = self.load::<DerivedDocument>(DERIVED_DOCUMENT).await? else {
            return Ok(None);
        };
        match document.rules {
            Some(rules) => Ok(Some((document.dispensers, rules))),
            None => {
                debug!("Saved rates carry no rules, re-deriving");
                Ok(None)
            }
        }
    }

    #[instrument(skip_all, fields(kinds = table.kind_count()))]
    pub async fn save_baseline(&self, table: &RateTable) -> Result<(), DocumentError> {
        let document = BaselineDocument {
            dispensers: table.clone(),
            saved_at: Some(Utc::now()),
        };
        self.save(BASELINE_DOCUMENT, &document).await
    }

    #[instrument(skip_all, fields(kinds = table.kind_count()))]
    pub async fn save_derived(&self, table: &RateTable, rules: RuleSnapshot) -> Result<(), DocumentError> {
        let document = DerivedDocument {
            dispensers: table.clone(),
            rules: Some(rules),
            saved_at: Some(Utc::now()),
        };
        self.save(DERIVED_DOCUMENT, &document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_doubles::TestStore;
    use crate::domain::value_objects::{ItemId, RuleSet, YieldCategory, YieldKey};
    use std::sync::atomic::Ordering;

    fn wood_table(amount: f32) -> RateTable {
        let mut table = RateTable::new();
        table.insert(
            YieldKey::new("wood_node".into(), YieldCategory::contained_items(), ItemId::new("wood")),
            amount,
        );
        table
    }

    #[tokio::test]
    async fn test_missing_documents_load_as_empty() {
        let repository = RateRepository::new(Arc::new(TestStore::default()));

        assert!(repository.load_baseline().await.unwrap().is_empty());
        assert!(repository.load_derived().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_saved_baseline_loads_as_empty_table() {
        let store = TestStore::default()
            .with_document(BASELINE_DOCUMENT, serde_json::json!({ "Dispensers": {} }));
        let repository = RateRepository::new(Arc::new(store));

        let table = repository.load_baseline().await.unwrap();
        assert!(table.is_empty());
        assert_eq!(table.rate_count(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let store = TestStore::default();
        store.fail_loads.store(true, Ordering::SeqCst);
        let repository = RateRepository::new(Arc::new(store));

        assert!(matches!(repository.load_baseline().await, Err(DocumentError::Io(_))));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = Arc::new(TestStore::default());
        let repository = RateRepository::new(store.clone());
        let rules = RuleSet::default().snapshot();

        repository.save_baseline(&wood_table(1000.0)).await.unwrap();
        repository.save_derived(&wood_table(2000.0), rules.clone()).await.unwrap();

        let saved = store.document(BASELINE_DOCUMENT).unwrap();
        assert_eq!(saved["Dispensers"]["wood_node"]["containedItems"]["wood"], 1000.0);
        assert!(saved["SavedAt"].is_string());

        assert_eq!(repository.load_baseline().await.unwrap(), wood_table(1000.0));
        assert_eq!(
            repository.load_derived().await.unwrap(),
            Some((wood_table(2000.0), rules))
        );
    }

    #[tokio::test]
    async fn test_derived_without_rules_is_ignored() {
        let store = TestStore::default().with_document(
            DERIVED_DOCUMENT,
            serde_json::json!({ "Dispensers": { "wood_node": { "containedItems": { "wood": 5.0 } } } }),
        );
        let repository = RateRepository::new(Arc::new(store));

        assert!(repository.load_derived().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_document_is_a_serialization_error() {
        let store = TestStore::default()
            .with_document(BASELINE_DOCUMENT, serde_json::json!({ "Dispensers": { "wood_node": 12 } }));
        let repository = RateRepository::new(Arc::new(store));

        assert!(matches!(
            repository.load_baseline().await,
            Err(DocumentError::Serialization(_))
        ));
    }
}
