//! Domain layer - Rate bookkeeping with no external dependencies
//!
//! This layer contains:
//! - Entities: the resource slots a dispenser exposes
//! - Value Objects: names, ids, rate tables and rule documents
//! - Aggregates: baseline and derived rate stores and the rate book root

pub mod aggregates;
pub mod entities;
pub mod value_objects;
