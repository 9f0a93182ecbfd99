//! Strongly-typed identifiers for domain entities

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(EntityId);

/// Defines a string-backed name type that serializes as a bare string
/// (and therefore works as a JSON object key).
macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_name!(
    /// Prefab path of a producer, e.g. `assets/bundled/prefabs/autospawn/resource/ores/stone-ore.prefab`
    EntityKind
);
define_name!(
    /// Yield bucket on a producer
    YieldCategory
);
define_name!(
    /// Item short name, e.g. `wood` or `metal.ore`
    ItemId
);

impl YieldCategory {
    pub const CONTAINED_ITEMS: &'static str = "containedItems";
    pub const FINISH_BONUS: &'static str = "finishBonus";

    /// Items handed out while the producer is being gathered
    pub fn contained_items() -> Self {
        Self::new(Self::CONTAINED_ITEMS)
    }

    /// Items handed out once when the producer is depleted
    pub fn finish_bonus() -> Self {
        Self::new(Self::FINISH_BONUS)
    }

    /// The buckets every dispenser exposes
    pub fn well_known() -> [Self; 2] {
        [Self::contained_items(), Self::finish_bonus()]
    }
}
