// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for output pin subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::types::PinLevel;

/// Unique identifier for a subscription.
///
/// IDs are unique within a registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// A level transition of an output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    /// Level before the write.
    pub previous: PinLevel,
    /// Level after the write.
    pub current: PinLevel,
}

type LevelCallback = Arc<dyn Fn(LevelChange) + Send + Sync>;

/// Registry for output pin callbacks.
///
/// Uses `parking_lot::RwLock` so callbacks can be registered from one task
/// while the sketch loop dispatches from another.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    level_callbacks: RwLock<HashMap<SubscriptionId, LevelCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            level_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback invoked whenever the pin level changes.
    ///
    /// Writes that leave the level unchanged are not reported.
    pub fn on_level_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(LevelChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.level_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.level_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.level_callbacks.write().clear();
    }

    /// Calls every registered callback with `change`.
    ///
    /// Callbacks are cloned out of the lock first, so a callback may
    /// subscribe or unsubscribe without deadlocking.
    pub fn dispatch(&self, change: LevelChange) {
        let callbacks: Vec<LevelCallback> = self.level_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(change);
        }
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.level_callbacks.read().len()
    }

    /// Returns `true` if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("level_callbacks", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn subscription_ids_are_unique() {
        let registry = CallbackRegistry::new();
        let a = registry.on_level_changed(|_| {});
        let b = registry.on_level_changed(|_| {});
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn dispatch_reaches_all_callbacks() {
        let registry = CallbackRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            registry.on_level_changed(move |change| {
                assert_eq!(change.current, PinLevel::High);
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        registry.dispatch(LevelChange {
            previous: PinLevel::Low,
            current: PinLevel::High,
        });
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unsubscribe_removes_callback() {
        let registry = CallbackRegistry::new();
        let id = registry.on_level_changed(|_| panic!("should not be called"));

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        assert!(registry.is_empty());

        registry.dispatch(LevelChange {
            previous: PinLevel::High,
            current: PinLevel::Low,
        });
    }

    #[test]
    fn clear_removes_everything() {
        let registry = CallbackRegistry::new();
        registry.on_level_changed(|_| {});
        registry.on_level_changed(|_| {});
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn subscription_id_display() {
        assert_eq!(SubscriptionId::new(7).to_string(), "Sub(7)");
    }
}
