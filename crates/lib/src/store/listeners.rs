//! Change listener registry shared by live store implementations.
//!
//! Listeners are stored as `Arc<dyn Fn(&ChangeEvent)>`. [`ListenerRegistry::notify`]
//! snapshots the matching listeners and releases its lock before calling them,
//! so a listener may subscribe, unsubscribe or write to the store while it runs.
//! A listener added during a notification is first called on the next one.

use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

use super::ChangeEvent;

/// Closure type for store change listeners.
pub type ChangeListener = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Handle returned when registering a listener, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

struct Registration {
    id: SubscriptionId,
    object_type: String,
    listener: ChangeListener,
}

/// Listeners keyed by the object type they observe.
#[derive(Default)]
pub struct ListenerRegistry {
    registrations: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for changes to `object_type`.
    pub fn add(&self, object_type: impl Into<String>, listener: ChangeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let object_type = object_type.into();
        tracing::trace!("Registering change listener {} for '{}'", id.0, object_type);
        self.registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration {
                id,
                object_type,
                listener,
            });
        id
    }

    /// Remove the listener identified by `id`.
    ///
    /// Returns false if no such listener was registered.
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut registrations = self
            .registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        registrations.len() < before
    }

    /// Deliver `event` to every listener registered for its object type.
    ///
    /// Returns the number of listeners called.
    pub fn notify(&self, event: &ChangeEvent) -> usize {
        let snapshot: Vec<ChangeListener> = {
            let registrations = self
                .registrations
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            registrations
                .iter()
                .filter(|r| r.object_type == event.object_type())
                .map(|r| Arc::clone(&r.listener))
                .collect()
        };

        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    /// Number of listeners registered for `object_type`.
    pub fn count_for(&self, object_type: &str) -> usize {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.object_type == object_type)
            .count()
    }

    /// Get the number of registered listeners.
    pub fn len(&self) -> usize {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
