//! Value objects - Immutable objects defined by their attributes

mod ids;
mod rate_table;
mod rules;

pub use ids::{EntityId, EntityKind, ItemId, YieldCategory};
pub use rate_table::{RateTable, YieldKey};
pub use rules::{ModifiersConfig, OverridesConfig, RuleSet, RuleSnapshot, RuleValidationError};

#[cfg(test)]
pub use rules::{DispenserOverride, ModifierRule, WILDCARD};
