//! Application layer - Use cases orchestrating the domain
//!
//! This layer contains:
//! - Ports: interfaces to storage, the host simulation and its permissions
//! - Services: rate synchronization, load coordination, lifecycle control
//! - DTOs: persisted documents and status reports

pub mod dto;
pub mod ports;
pub mod services;
