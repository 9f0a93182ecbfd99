//! Rule documents - Modifiers.json and Overrides.json
//!
//! Read once at startup. A missing document is written out with its defaults
//! so operators have something to edit.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::value_objects::{ModifiersConfig, OverridesConfig, RuleSet};

pub const MODIFIERS_FILE: &str = "Modifiers.json";
pub const OVERRIDES_FILE: &str = "Overrides.json";

/// Load both rule documents from `config_dir`
pub async fn load_rules(config_dir: &Path) -> Result<RuleSet> {
    let modifiers: ModifiersConfig = load_or_create(&config_dir.join(MODIFIERS_FILE)).await?;
    let overrides: OverridesConfig = load_or_create(&config_dir.join(OVERRIDES_FILE)).await?;
    tracing::info!(
        overridden_kinds = overrides.overrides.dispensers.len(),
        "Loaded rule documents from {}",
        config_dir.display()
    );
    Ok(RuleSet::new(modifiers, overrides))
}

async fn load_or_create<T>(path: &Path) -> Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    match tokio::fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let document = T::default();
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let json = serde_json::to_vec_pretty(&document)?;
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write default {}", path.display()))?;
            tracing::info!("Created default rule document {}", path.display());
            Ok(document)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{EntityKind, ItemId};

    #[tokio::test]
    async fn test_missing_documents_are_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let rules = load_rules(dir.path()).await.unwrap();
        assert_eq!(rules, RuleSet::default());
        assert!(dir.path().join(MODIFIERS_FILE).exists());
        assert!(dir.path().join(OVERRIDES_FILE).exists());

        // The written defaults read back to the same rules
        assert_eq!(load_rules(dir.path()).await.unwrap(), rules);
    }

    #[tokio::test]
    async fn test_reads_operator_documents() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(
            dir.path().join(MODIFIERS_FILE),
            r#"{ "ResourceDispensers": { "wood": 2.0, "*": 1.5 } }"#,
        )
        .await
        .unwrap();
        tokio::fs::write(
            dir.path().join(OVERRIDES_FILE),
            r#"{ "Overrides": { "Dispensers": { "stone_node": { "ContainedItems": { "stones": 900 } } } } }"#,
        )
        .await
        .unwrap();

        let rules = load_rules(dir.path()).await.unwrap();
        assert_eq!(rules.dispenser_modifiers().multiplier_for(&ItemId::new("wood")), 2.0);
        assert_eq!(rules.dispenser_modifiers().multiplier_for(&ItemId::new("stones")), 1.5);
        assert!(rules.dispenser_override(&EntityKind::new("stone_node")).is_some());
        assert_eq!(rules.modifiers.excavator.time_for_full_resources, 120.0);
    }

    #[tokio::test]
    async fn test_malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(MODIFIERS_FILE), "{ not json").await.unwrap();

        assert!(load_rules(dir.path()).await.is_err());
    }
}
