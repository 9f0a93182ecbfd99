//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: document stores for the rate tables (JSON files, SQLite, memory)
//! - World: the in-memory host world holding live dispensers
//! - Host events: the controller task and the events that drive it
//! - HTTP: admin REST API routes
//! - Config: Application configuration and rule documents

pub mod config;
pub mod host_events;
pub mod http;
pub mod permissions;
pub mod persistence;
pub mod rules_loader;
pub mod state;
pub mod world;
