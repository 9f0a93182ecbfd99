//! Application configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

/// Where rate documents are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON files in the data directory
    File,
    Sqlite,
    /// Nothing survives a restart
    Memory,
}

/// Application configuration loaded from `YIELDKEEPER_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory for the persisted rate documents
    pub data_dir: PathBuf,
    /// Directory holding Modifiers.json and Overrides.json
    pub config_dir: PathBuf,

    pub store_backend: StoreBackend,
    /// SQLite database file, used by the sqlite backend only
    pub sqlite_path: PathBuf,

    /// Seconds between periodic saves
    pub save_interval_secs: u64,

    /// Optional JSON list of dispensers to seed the in-memory world with
    #[serde(default)]
    pub world_fixture: Option<PathBuf>,

    /// Admin HTTP server port
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::with_prefix("YIELDKEEPER").try_parsing(true))
    }

    fn from_source(environment: Environment) -> Result<Self> {
        let config = Config::builder()
            .set_default("data_dir", "./data")?
            .set_default("config_dir", "./config")?
            .set_default("store_backend", "file")?
            .set_default("sqlite_path", "./data/yieldkeeper.db")?
            .set_default("save_interval_secs", 300)?
            .set_default("server_port", 3000)?
            .add_source(environment)
            .build()
            .context("Failed to read YIELDKEEPER_* configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Invalid YIELDKEEPER_* configuration")?;
        anyhow::ensure!(config.save_interval_secs > 0, "YIELDKEEPER_SAVE_INTERVAL_SECS must be greater than zero");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("YIELDKEEPER")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_source(environment(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.store_backend, StoreBackend::File);
        assert_eq!(config.save_interval_secs, 300);
        assert_eq!(config.server_port, 3000);
        assert!(config.world_fixture.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_source(environment(&[
            ("YIELDKEEPER_STORE_BACKEND", "sqlite"),
            ("YIELDKEEPER_SERVER_PORT", "8080"),
            ("YIELDKEEPER_WORLD_FIXTURE", "./world.json"),
        ]))
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Sqlite);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.world_fixture, Some(PathBuf::from("./world.json")));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(AppConfig::from_source(environment(&[("YIELDKEEPER_STORE_BACKEND", "neo4j")])).is_err());
    }

    #[test]
    fn test_zero_save_interval_is_rejected() {
        assert!(AppConfig::from_source(environment(&[("YIELDKEEPER_SAVE_INTERVAL_SECS", "0")])).is_err());
    }
}
