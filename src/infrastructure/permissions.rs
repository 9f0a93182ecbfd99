//! In-process permission registry

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use crate::application::ports::outbound::PermissionRegistryPort;

#[derive(Default)]
pub struct InMemoryPermissionRegistry {
    names: Mutex<BTreeSet<String>>,
}

impl InMemoryPermissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn registered(&self) -> Vec<String> {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl PermissionRegistryPort for InMemoryPermissionRegistry {
    fn exists(&self, name: &str) -> bool {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    fn register(&self, name: &str) {
        tracing::info!(permission = name, "Registering permission");
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string());
    }
}
