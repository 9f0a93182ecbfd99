//! In-memory host world
//!
//! Stands in for the simulation that owns the dispensers. Entities are kept
//! behind a blocking mutex that is only held inside synchronous visits.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::{EntitySourcePort, LiveDispenser};
use crate::domain::entities::ResourceSlot;
use crate::domain::value_objects::{EntityId, EntityKind, ItemId, YieldCategory};

fn full_fraction() -> f32 {
    1.0
}

/// A dispenser to place into the world, as read from a fixture or request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispenserSpec {
    pub kind: EntityKind,
    #[serde(default = "full_fraction")]
    pub fraction_remaining: f32,
    #[serde(default)]
    pub contained_items: BTreeMap<ItemId, f32>,
    #[serde(default)]
    pub finish_bonus: BTreeMap<ItemId, f32>,
}

/// A dispenser component living in the world
#[derive(Debug, Clone, Serialize)]
pub struct SimDispenser {
    pub id: EntityId,
    pub kind: EntityKind,
    pub fraction_remaining: f32,
    pub slots: Vec<ResourceSlot>,
    /// Sum of all start amounts, recomputed on every commit
    pub total_start_amount: f32,
    pub commits: usize,
}

impl SimDispenser {
    fn from_spec(id: EntityId, spec: DispenserSpec) -> Self {
        let fraction_remaining = spec.fraction_remaining.clamp(0.0, 1.0);
        let slots = [
            (YieldCategory::contained_items(), spec.contained_items),
            (YieldCategory::finish_bonus(), spec.finish_bonus),
        ]
        .into_iter()
        .flat_map(|(category, items)| {
            items.into_iter().map(move |(item, start_amount)| ResourceSlot {
                category: category.clone(),
                item,
                start_amount,
                amount: start_amount * fraction_remaining,
            })
        })
        .collect();

        let mut dispenser = Self {
            id,
            kind: spec.kind,
            fraction_remaining,
            slots,
            total_start_amount: 0.0,
            commits: 0,
        };
        dispenser.recompute();
        dispenser
    }

    fn recompute(&mut self) {
        self.total_start_amount = self.slots.iter().map(|slot| slot.start_amount).sum();
    }
}

impl LiveDispenser for SimDispenser {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> &EntityKind {
        &self.kind
    }

    fn fraction_remaining(&self) -> f32 {
        self.fraction_remaining
    }

    fn slots(&self) -> &[ResourceSlot] {
        &self.slots
    }

    fn commit(&mut self, slots: Vec<ResourceSlot>) {
        self.slots = slots;
        self.commits += 1;
        self.recompute();
    }
}

struct WorldEntity {
    id: EntityId,
    dispenser: Option<SimDispenser>,
}

#[derive(Default)]
pub struct InMemoryWorld {
    entities: Mutex<Vec<WorldEntity>>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn entities(&self) -> MutexGuard<'_, Vec<WorldEntity>> {
        self.entities.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place a new entity with a dispenser component
    pub fn spawn(&self, spec: DispenserSpec) -> EntityId {
        let id = EntityId::new();
        self.entities().push(WorldEntity {
            id,
            dispenser: Some(SimDispenser::from_spec(id, spec)),
        });
        id
    }

    /// Place a new entity that yields nothing
    #[cfg(test)]
    pub fn spawn_inert(&self) -> EntityId {
        let id = EntityId::new();
        self.entities().push(WorldEntity { id, dispenser: None });
        id
    }

    pub fn dispenser(&self, id: EntityId) -> Option<SimDispenser> {
        self.entities()
            .iter()
            .find(|entity| entity.id == id)
            .and_then(|entity| entity.dispenser.clone())
    }

    pub fn len(&self) -> usize {
        self.entities().len()
    }

    /// Read a JSON list of dispensers
    pub async fn load_fixture(path: &Path) -> Result<Vec<DispenserSpec>> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read world fixture {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse world fixture {}", path.display()))
    }
}

impl EntitySourcePort for InMemoryWorld {
    fn visit_all(&self, visitor: &mut dyn FnMut(&mut dyn LiveDispenser)) {
        for dispenser in self.entities().iter_mut().filter_map(|e| e.dispenser.as_mut()) {
            visitor(dispenser);
        }
    }

    fn visit(&self, id: EntityId, visitor: &mut dyn FnMut(&mut dyn LiveDispenser)) -> bool {
        let mut entities = self.entities();
        let Some(dispenser) = entities
            .iter_mut()
            .find(|entity| entity.id == id)
            .and_then(|entity| entity.dispenser.as_mut())
        else {
            return false;
        };
        visitor(dispenser);
        true
    }
}
