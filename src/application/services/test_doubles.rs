//! In-memory port doubles shared by the service tests

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::outbound::{
    DocumentError, DocumentStorePort, EntitySourcePort, LiveDispenser, PermissionRegistryPort,
};
use crate::domain::entities::ResourceSlot;
use crate::domain::value_objects::{EntityId, EntityKind, ItemId, YieldCategory};

pub struct TestDispenser {
    pub id: EntityId,
    pub kind: EntityKind,
    pub fraction_remaining: f32,
    pub slots: Vec<ResourceSlot>,
    pub commits: usize,
}

impl TestDispenser {
    /// `(category, item, start_amount)` triples; live amounts follow the fraction
    pub fn new(kind: &str, fraction_remaining: f32, slots: &[(&str, &str, f32)]) -> Self {
        let slots = slots
            .iter()
            .map(|(category, item, start)| ResourceSlot {
                category: YieldCategory::new(*category),
                item: ItemId::new(*item),
                start_amount: *start,
                amount: *start * fraction_remaining,
            })
            .collect();
        Self {
            id: EntityId::new(),
            kind: EntityKind::new(kind),
            fraction_remaining,
            slots,
            commits: 0,
        }
    }

    pub fn wood(start_amount: f32, fraction_remaining: f32) -> Self {
        Self::new(
            "wood_node",
            fraction_remaining,
            &[("containedItems", "wood", start_amount), ("finishBonus", "charcoal", 3.0)],
        )
    }
}

impl LiveDispenser for TestDispenser {
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
    }
}

#[derive(Default)]
pub struct TestWorld(Mutex<Vec<TestDispenser>>);

impl TestWorld {
    pub fn with(dispensers: Vec<TestDispenser>) -> Self {
        Self(Mutex::new(dispensers))
    }

    pub fn spawn(&self, dispenser: TestDispenser) -> EntityId {
        let id = dispenser.id;
        self.0.lock().unwrap().push(dispenser);
        id
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.0.lock().unwrap().iter().map(|d| d.id).collect()
    }

    pub fn start_amount(&self, id: EntityId, item: &str) -> Option<f32> {
        let dispensers = self.0.lock().unwrap();
        let dispenser = dispensers.iter().find(|d| d.id == id)?;
        dispenser
            .slots
            .iter()
            .find(|slot| slot.item.as_str() == item)
            .map(|slot| slot.start_amount)
    }

    pub fn commits(&self, id: EntityId) -> usize {
        let dispensers = self.0.lock().unwrap();
        dispensers.iter().find(|d| d.id == id).map_or(0, |d| d.commits)
    }

    pub fn total_commits(&self) -> usize {
        self.0.lock().unwrap().iter().map(|d| d.commits).sum()
    }
}

impl EntitySourcePort for TestWorld {
    fn visit_all(&self, visitor: &mut dyn FnMut(&mut dyn LiveDispenser)) {
        for dispenser in self.0.lock().unwrap().iter_mut() {
            visitor(dispenser);
        }
    }

    fn visit(&self, id: EntityId, visitor: &mut dyn FnMut(&mut dyn LiveDispenser)) -> bool {
        let mut dispensers = self.0.lock().unwrap();
        match dispensers.iter_mut().find(|d| d.id == id) {
            Some(dispenser) => {
                visitor(dispenser);
                true
            }
            None => false,
        }
    }
}

#[derive(Default)]
pub struct TestStore {
    documents: Mutex<HashMap<String, serde_json::Value>>,
    pub fail_loads: AtomicBool,
    pub fail_saves: AtomicBool,
    pub saves: AtomicUsize,
}

impl TestStore {
    pub fn with_document(self, name: &str, document: serde_json::Value) -> Self {
        self.documents.lock().unwrap().insert(name.to_string(), document);
        self
    }

    pub fn document(&self, name: &str) -> Option<serde_json::Value> {
        self.documents.lock().unwrap().get(name).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStorePort for TestStore {
    async fn load_document(&self, name: &str) -> Result<serde_json::Value, DocumentError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(DocumentError::Io(format!("cannot read {name}")));
        }
        self.document(name)
            .ok_or_else(|| DocumentError::NotFound(name.to_string()))
    }

    async fn save_document(&self, name: &str, document: &serde_json::Value) -> Result<(), DocumentError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DocumentError::Io(format!("cannot write {name}")));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.documents
            .lock()
            .unwrap()
            .insert(name.to_string(), document.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct TestPermissions {
    names: Mutex<BTreeSet<String>>,
    pub registrations: AtomicUsize,
}

impl PermissionRegistryPort for TestPermissions {
    fn exists(&self, name: &str) -> bool {
        self.names.lock().unwrap().contains(name)
    }

    fn register(&self, name: &str) {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.names.lock().unwrap().insert(name.to_string());
    }
}
