//! Entity source port - Interface to the live simulation's dispensers
//!
//! The host owns its entities. This port only lets the application visit
//! them, one at a time, for the duration of a synchronous callback.

use crate::domain::entities::ResourceSlot;
use crate::domain::value_objects::{EntityId, EntityKind};

/// A live resource dispenser inside the host simulation
pub trait LiveDispenser {
    fn entity_id(&self) -> EntityId;

    /// Stable kind identifier shared by all dispensers of the same prefab
    fn kind(&self) -> &EntityKind;

    /// Share of total capacity not yet gathered, in [0, 1]
    fn fraction_remaining(&self) -> f32;

    /// Current yields, contained items first, then finish bonus
    fn slots(&self) -> &[ResourceSlot];

    /// Write new start/current amounts and let the host recompute any
    /// state derived from them
    fn commit(&mut self, slots: Vec<ResourceSlot>);
}

/// Port for enumerating and looking up live dispensers
///
/// # Examples
///
/// ```ignore
/// let mut kinds = Vec::new();
/// source.visit_all(&mut |dispenser| kinds.push(dispenser.kind().clone()));
/// ```
pub trait EntitySourcePort: Send + Sync {
    /// Visit every live entity that has a dispenser component
    fn visit_all(&self, visitor: &mut dyn FnMut(&mut dyn LiveDispenser));

    /// Visit one entity's dispenser.
    ///
    /// Returns false when the entity is gone or has no dispenser component.
    fn visit(&self, id: EntityId, visitor: &mut dyn FnMut(&mut dyn LiveDispenser)) -> bool;
}
