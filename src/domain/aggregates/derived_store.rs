//! Derived store - target yields computed from baseline and rules

use tracing::debug;

use crate::domain::aggregates::BaselineStore;
use crate::domain::value_objects::{EntityKind, RateTable, RuleSet};

/// What a call to [`DerivedStore::derive`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeriveOutcome {
    /// The kind was derived earlier; nothing recomputed
    AlreadyDerived,
    /// No baseline exists for the kind yet
    NoBaseline,
    /// Rates were computed for the kind
    Derived { rates: usize, overridden: usize },
}

/// Target yield amounts per entity kind, memoized once per kind
#[derive(Debug, Clone, Default)]
pub struct DerivedStore {
    table: RateTable,
}

impl DerivedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the target rates of a kind from its baseline.
    ///
    /// Resolution per baseline entry: an override amount for that exact
    /// category and item wins; otherwise the baseline is scaled by the
    /// dispenser modifier (exact item, then wildcard, then 1.0).
    pub fn derive(&mut self, kind: &EntityKind, baseline: &BaselineStore, rules: &RuleSet) -> DeriveOutcome {
        if self.table.contains_kind(kind) {
            return DeriveOutcome::AlreadyDerived;
        }
        if !baseline.contains_kind(kind) {
            return DeriveOutcome::NoBaseline;
        }

        let modifiers = rules.dispenser_modifiers();
        let override_rule = rules.dispenser_override(kind);

        self.table.insert_kind(kind.clone());
        let mut rates = 0;
        let mut overridden = 0;
        for (key, amount) in baseline.table().entries_for(kind) {
            let target = match override_rule.and_then(|rule| rule.amount_for(&key.category, &key.item)) {
                Some(absolute) => {
                    overridden += 1;
                    absolute
                }
                None => amount * modifiers.multiplier_for(&key.item),
            };
            self.table.insert(key.clone(), target);
            rates += 1;
        }

        if let Some(rule) = override_rule {
            for (category, item, _) in rule.entries() {
                if baseline.get(kind, &category, item).is_none() {
                    debug!(kind = %kind, category = %category, item = %item, "Override has no baseline entry, ignoring");
                }
            }
        }

        DeriveOutcome::Derived { rates, overridden }
    }

    #[cfg(test)]
    pub fn contains_kind(&self, kind: &EntityKind) -> bool {
        self.table.contains_kind(kind)
    }

    pub fn table(&self) -> &RateTable {
        &self.table
    }

    /// Adopt previously derived rates loaded from storage
    pub fn replace(&mut self, table: RateTable) {
        self.table = table;
    }
}
