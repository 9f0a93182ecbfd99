//! Rate tables - yield amounts keyed by (entity kind, category, item)
//!
//! Storage is one flat ordered map keyed by [`YieldKey`]. The three-level
//! `kind -> category -> item` grouping only exists in the serialized form,
//! which keeps persisted documents readable.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::ids::{EntityKind, ItemId, YieldCategory};

/// Composite identity of a single yield rate
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YieldKey {
    pub kind: EntityKind,
    pub category: YieldCategory,
    pub item: ItemId,
}

impl YieldKey {
    pub fn new(kind: EntityKind, category: YieldCategory, item: ItemId) -> Self {
        Self { kind, category, item }
    }

    /// The smallest key of a kind, used as the lower bound of range scans
    fn first_of(kind: &EntityKind) -> Self {
        Self::new(kind.clone(), YieldCategory::new(""), ItemId::new(""))
    }
}

/// Nested `kind -> category -> item -> amount` shape used on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestedRates(pub BTreeMap<EntityKind, BTreeMap<YieldCategory, BTreeMap<ItemId, f32>>>);

/// Yield amounts for every known entity kind
///
/// A kind can be known without having any rates (a dispenser that yields
/// nothing), so the set of kinds is tracked separately from the rates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "NestedRates", into = "NestedRates")]
pub struct RateTable {
    kinds: BTreeSet<EntityKind>,
    rates: BTreeMap<YieldKey, f32>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_kind(&self, kind: &EntityKind) -> bool {
        self.kinds.contains(kind)
    }

    /// Mark a kind as known. Returns false if it already was.
    pub fn insert_kind(&mut self, kind: EntityKind) -> bool {
        self.kinds.insert(kind)
    }

    /// Set a rate, registering its kind. Returns the previous amount.
    pub fn insert(&mut self, key: YieldKey, amount: f32) -> Option<f32> {
        if !self.kinds.contains(&key.kind) {
            self.kinds.insert(key.kind.clone());
        }
        self.rates.insert(key, amount)
    }

    pub fn get(&self, key: &YieldKey) -> Option<f32> {
        self.rates.get(key).copied()
    }

    pub fn rate_for(&self, kind: &EntityKind, category: &YieldCategory, item: &ItemId) -> Option<f32> {
        self.get(&YieldKey::new(kind.clone(), category.clone(), item.clone()))
    }

    /// All rates recorded for one kind, in key order
    pub fn entries_for<'a>(&'a self, kind: &'a EntityKind) -> impl Iterator<Item = (&'a YieldKey, f32)> + 'a {
        self.rates
            .range(YieldKey::first_of(kind)..)
            .take_while(move |(key, _)| &key.kind == kind)
            .map(|(key, amount)| (key, *amount))
    }

    /// Drop every kind (and its rates) that fails the predicate
    pub fn retain_kinds(&mut self, mut keep: impl FnMut(&EntityKind) -> bool) {
        self.kinds.retain(|kind| keep(kind));
        let kinds = &self.kinds;
        self.rates.retain(|key, _| kinds.contains(&key.kind));
    }

    pub fn kind_count(&self) -> usize {
        self.kinds.len()
    }

    /// Number of individual rates
    pub fn rate_count(&self) -> usize {
        self.rates.len()
    }

    /// True when no kind is known, not even one without rates
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl From<NestedRates> for RateTable {
    fn from(nested: NestedRates) -> Self {
        let mut table = RateTable::new();
        for (kind, categories) in nested.0 {
            table.insert_kind(kind.clone());
            for (category, items) in categories {
                for (item, amount) in items {
                    table.insert(YieldKey::new(kind.clone(), category.clone(), item), amount);
                }
            }
        }
        table
    }
}

impl From<RateTable> for NestedRates {
    fn from(table: RateTable) -> Self {
        let mut nested = BTreeMap::new();
        for kind in table.kinds {
            // Every known kind lists the well-known buckets, even when empty
            let categories: BTreeMap<_, _> = YieldCategory::well_known()
                .into_iter()
                .map(|category| (category, BTreeMap::new()))
                .collect();
            nested.insert(kind, categories);
        }
        for (key, amount) in table.rates {
            nested
                .entry(key.kind)
                .or_insert_with(BTreeMap::new)
                .entry(key.category)
                .or_insert_with(BTreeMap::new)
                .insert(key.item, amount);
        }
        NestedRates(nested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(kind: &str, category: &str, item: &str) -> YieldKey {
        YieldKey::new(kind.into(), category.into(), item.into())
    }

    #[test]
    fn test_entries_for_only_returns_that_kind() {
        let mut table = RateTable::new();
        table.insert(key("a", "containedItems", "wood"), 10.0);
        table.insert(key("b", "containedItems", "stones"), 20.0);
        table.insert(key("b", "finishBonus", "metal.ore"), 5.0);
        table.insert(key("c", "containedItems", "sulfur.ore"), 7.0);

        let kind = EntityKind::new("b");
        let entries: Vec<_> = table
            .entries_for(&kind)
            .map(|(k, amount)| (k.item.as_str().to_string(), amount))
            .collect();
        assert_eq!(
            entries,
            vec![("stones".to_string(), 20.0), ("metal.ore".to_string(), 5.0)]
        );
    }

    #[test]
    fn test_kind_without_rates_is_known() {
        let mut table = RateTable::new();
        assert!(table.insert_kind("empty_node".into()));
        assert!(!table.insert_kind("empty_node".into()));
        assert!(table.contains_kind(&"empty_node".into()));
        assert_eq!(table.rate_count(), 0);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_nested_json_shape() {
        let mut table = RateTable::new();
        table.insert(key("wood_node", "containedItems", "wood"), 1000.0);

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "wood_node": {
                    "containedItems": { "wood": 1000.0 },
                    "finishBonus": {}
                }
            })
        );

        let back: RateTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_empty_kind_survives_deserialization() {
        let json = serde_json::json!({ "bare_node": { "containedItems": {}, "finishBonus": {} } });
        let table: RateTable = serde_json::from_value(json).unwrap();
        assert!(table.contains_kind(&"bare_node".into()));
        assert_eq!(table.rate_count(), 0);
    }

    #[test]
    fn test_retain_kinds() {
        let mut table = RateTable::new();
        table.insert(key("keep", "containedItems", "wood"), 1.0);
        table.insert(key("drop", "containedItems", "wood"), 2.0);

        table.retain_kinds(|kind| kind.as_str() == "keep");

        assert_eq!(table.kind_count(), 1);
        assert_eq!(table.get(&key("keep", "containedItems", "wood")), Some(1.0));
        assert_eq!(table.get(&key("drop", "containedItems", "wood")), None);
    }
}
