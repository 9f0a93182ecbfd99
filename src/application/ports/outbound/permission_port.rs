//! Permission port - the host's access-control registry

/// Permission guarding the operational commands
pub const ADMIN_PERMISSION: &str = "yieldkeeper.admin";

pub trait PermissionRegistryPort: Send + Sync {
    fn exists(&self, name: &str) -> bool;
    fn register(&self, name: &str);
}
