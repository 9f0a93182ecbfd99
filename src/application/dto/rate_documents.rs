//! Persisted rate documents
//!
//! Both documents keep the nested `Dispensers` shape so they stay readable
//! and hand-editable on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{RateTable, RuleSnapshot};

/// Document name of the baseline table
pub const BASELINE_DOCUMENT: &str = "VanillaRates";
/// Document name of the derived table
pub const DERIVED_DOCUMENT: &str = "Rates";

/// Baseline yields as observed before any rule was applied
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaselineDocument {
    #[serde(default)]
    pub dispensers: RateTable,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Derived yields plus the rules they were derived with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DerivedDocument {
    #[serde(default)]
    pub dispensers: RateTable,
    /// Missing in hand-written documents; such tables are never reused
    #[serde(default)]
    pub rules: Option<RuleSnapshot>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}
