//! Domain entities - Core business objects

mod resource_slot;

pub use resource_slot::ResourceSlot;
