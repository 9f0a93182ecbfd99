//! Baseline store - the yields dispensers had before any rules touched them

use crate::domain::entities::ResourceSlot;
use crate::domain::value_objects::{EntityKind, ItemId, RateTable, YieldCategory, YieldKey};

/// Originally observed yield amounts per entity kind
///
/// Entries are write-once: the first dispenser seen for a kind decides its
/// baseline, and later observations of that kind never change it.
#[derive(Debug, Clone, Default)]
pub struct BaselineStore {
    table: RateTable,
}

impl BaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a kind from one of its live dispensers.
    ///
    /// Returns true when the kind was new. Subsequent calls for a known kind
    /// are no-ops.
    pub fn capture(&mut self, kind: &EntityKind, slots: &[ResourceSlot]) -> bool {
        if self.table.contains_kind(kind) {
            return false;
        }

        self.table.insert_kind(kind.clone());
        for slot in slots {
            let key = YieldKey::new(kind.clone(), slot.category.clone(), slot.item.clone());
            // A dispenser listing the same item twice keeps the first amount
            if self.table.get(&key).is_none() {
                self.table.insert(key, slot.start_amount);
            }
        }
        true
    }

    pub fn get(&self, kind: &EntityKind, category: &YieldCategory, item: &ItemId) -> Option<f32> {
        self.table.rate_for(kind, category, item)
    }

    pub fn contains_kind(&self, kind: &EntityKind) -> bool {
        self.table.contains_kind(kind)
    }

    pub fn table(&self) -> &RateTable {
        &self.table
    }

    /// Replace the whole table with a loaded one
    pub fn replace(&mut self, table: RateTable) {
        self.table = table;
    }
}
