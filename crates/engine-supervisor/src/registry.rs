//! Process-wide set of live engine instances.
//!
//! The registry holds non-owning (`Weak`) references: ownership of each
//! child process lives with whoever holds the `Arc<EngineInstance>` (the
//! Service Facade); the registry exists only to guarantee every live
//! instance gets `stop()`-ed on shutdown.

use std::sync::{Arc, Mutex, Weak};

use crate::instance::EngineInstance;

/// Tracks every live [`EngineInstance`] so [`EngineRegistry::shutdown_all`]
/// can reap them all on any exit path.
#[derive(Default)]
pub struct EngineRegistry {
    instances: Mutex<Vec<Weak<EngineInstance>>>,
}

impl EngineRegistry {
    /// Creates an empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers an instance. Called by [`EngineInstance::new`]; not
    /// normally called directly.
    pub fn register(&self, instance: &Arc<EngineInstance>) {
        let mut guard = self.instances.lock().expect("registry lock poisoned");
        guard.push(Arc::downgrade(instance));
    }

    /// Removes the instance with the given id. A no-op if it is not
    /// present (already unregistered, or never registered).
    pub fn unregister(&self, instance_id: u64) {
        let mut guard = self.instances.lock().expect("registry lock poisoned");
        guard.retain(|weak| match weak.upgrade() {
            Some(inst) => inst.id() != instance_id,
            None => false,
        });
    }

    /// Current count of still-live registered instances. Used by tests and
    /// diagnostics, not by the core shutdown path.
    pub fn len(&self) -> usize {
        let guard = self.instances.lock().expect("registry lock poisoned");
        guard.iter().filter(|w| w.upgrade().is_some()).count()
    }

    /// True if no live instances remain registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshots the current set and calls `stop()` on each live instance.
    /// Safe to call repeatedly: a second call simply finds nothing left to
    /// stop.
    pub async fn shutdown_all(&self) {
        let snapshot: Vec<Arc<EngineInstance>> = {
            let guard = self.instances.lock().expect("registry lock poisoned");
            guard.iter().filter_map(Weak::upgrade).collect()
        };

        tracing::info!(count = snapshot.len(), "shutting down engine instances");
        for instance in snapshot {
            instance.stop().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_is_empty() {
        let registry = EngineRegistry::new();
        assert!(registry.is_empty());
    }
}
