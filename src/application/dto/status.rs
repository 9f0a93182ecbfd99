//! Status and report DTOs

use serde::{Deserialize, Serialize};

/// Lifecycle of the rate controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Uninitialized,
    Loading,
    Ready,
    /// Startup failed; behaves as uninitialized for the rest of the session
    Failed,
    ShuttingDown,
    Restored,
}

/// Result of synchronizing every live dispenser with a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Dispensers that were changed
    pub updated: usize,
    /// Dispensers visited
    pub total: usize,
}

/// Outcome of an operational command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandState {
    Completed,
    /// Rates are not initialized yet, nothing was done
    NotReady,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub kinds: usize,
    pub rates: usize,
}

/// Snapshot of the controller for the admin surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub state: LifecycleState,
    pub baseline: TableSummary,
    pub derived: TableSummary,
}
