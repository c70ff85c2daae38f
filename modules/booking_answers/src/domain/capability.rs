//! Capability checks against the host's access control service

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// Capability required to download booking answers
pub const CAPABILITY_UPDATE_BOOKING: &str = "mod/booking:updatebooking";

/// Trait for asking the host whether the current user holds a capability
///
/// This abstraction allows switching between mock and real implementations
/// for testing and production use.
pub trait CapabilityChecker: Send + Sync {
    /// Whether the current user holds `capability` in the context of `scope_id`
    fn has_capability(&self, capability: &str, scope_id: i64) -> bool;
}

/// Denies every capability
#[derive(Clone, Default)]
pub struct NoOpCapabilityChecker;

impl CapabilityChecker for NoOpCapabilityChecker {
    fn has_capability(&self, _capability: &str, _scope_id: i64) -> bool {
        false
    }
}

/// In-memory capability grants for testing
///
/// A grant without scope id holds in every scope.
#[derive(Clone, Default)]
pub struct MockCapabilityChecker {
    grants: Arc<RwLock<HashSet<(String, Option<i64>)>>>,
}

impl MockCapabilityChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `capability` everywhere
    pub fn grant(&self, capability: &str) {
        self.grants.write().insert((capability.to_string(), None));
    }

    /// Grant `capability` in one scope only
    pub fn grant_in_scope(&self, capability: &str, scope_id: i64) {
        self.grants
            .write()
            .insert((capability.to_string(), Some(scope_id)));
    }

    pub fn revoke_all(&self) {
        self.grants.write().clear();
    }
}

impl CapabilityChecker for MockCapabilityChecker {
    fn has_capability(&self, capability: &str, scope_id: i64) -> bool {
        let grants = self.grants.read();
        grants.contains(&(capability.to_string(), None))
            || grants.contains(&(capability.to_string(), Some(scope_id)))
    }
}
