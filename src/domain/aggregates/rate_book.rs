//! Rate Book - The root aggregate for baseline and derived rates
//!
//! Capture and derivation always go through the rate book so that a kind is
//! derived as soon as its baseline is known.

use tracing::{debug, info};

use crate::domain::aggregates::derived_store::DeriveOutcome;
use crate::domain::aggregates::{BaselineStore, DerivedStore};
use crate::domain::entities::ResourceSlot;
use crate::domain::value_objects::{EntityKind, RateTable, RuleSet, RuleSnapshot};

/// The Rate Book Aggregate Root
#[derive(Debug, Clone)]
pub struct RateBook {
    baseline: BaselineStore,
    derived: DerivedStore,
    rules: RuleSet,
}

impl RateBook {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            baseline: BaselineStore::new(),
            derived: DerivedStore::new(),
            rules,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn baseline(&self) -> &RateTable {
        self.baseline.table()
    }

    pub fn derived(&self) -> &RateTable {
        self.derived.table()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Make sure a dispenser kind has a baseline and derived rates.
    ///
    /// Returns true when the kind had not been seen before.
    pub fn ensure_recorded(&mut self, kind: &EntityKind, slots: &[ResourceSlot]) -> bool {
        let captured = self.baseline.capture(kind, slots);
        if let DeriveOutcome::Derived { rates, overridden } = self.derived.derive(kind, &self.baseline, &self.rules) {
            debug!(kind = %kind, rates, overridden, "Derived dispenser rates");
        }
        captured
    }

    /// Install the tables loaded at startup.
    ///
    /// Persisted derived rates are only reused when they were derived with
    /// the current rules, and only for kinds that still have a baseline.
    pub fn restore(&mut self, baseline: RateTable, derived: Option<(RateTable, RuleSnapshot)>) {
        self.baseline.replace(baseline);

        let Some((mut table, snapshot)) = derived else {
            return;
        };
        if snapshot != self.rules.snapshot() {
            info!(
                discarded = table.kind_count(),
                "Dispenser rules changed since the last save, re-deriving rates"
            );
            return;
        }
        let baseline = &self.baseline;
        table.retain_kinds(|kind| baseline.contains_kind(kind));
        self.derived.replace(table);
    }
}
