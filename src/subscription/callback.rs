// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for light state subscriptions.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::{CommandFailure, StateChange};

/// Unique identifier for a subscription.
///
/// IDs are unique within the registry that issued them.
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

/// Generates subscription IDs for one registry.
#[derive(Debug)]
pub(crate) struct IdGenerator(AtomicU64);

impl IdGenerator {
    pub(crate) fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    pub(crate) fn next(&self) -> SubscriptionId {
        SubscriptionId::new(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

type CommandFailedCallback = Arc<dyn Fn(&CommandFailure) + Send + Sync>;

/// Registry for light notification callbacks.
///
/// One registry is shared by every light of a platform so a host adapter
/// subscribes once. Callbacks run synchronously on the task that completed
/// the operation, in arbitrary order.
pub struct CallbackRegistry {
    ids: IdGenerator,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
    command_failed_callbacks: RwLock<HashMap<SubscriptionId, CommandFailedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: IdGenerator::new(),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            command_failed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a callback for successful operations.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.ids.next();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for failed operations.
    pub fn on_command_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CommandFailure) + Send + Sync + 'static,
    {
        let id = self.ids.next();
        self.command_failed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.state_changed_callbacks.write().remove(&id).is_some() {
            return true;
        }
        self.command_failed_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_changed_callbacks.write().clear();
        self.command_failed_callbacks.write().clear();
    }

    /// Dispatches a state change to every state callback.
    pub fn dispatch(&self, change: &StateChange) {
        // Snapshot so callbacks may subscribe or unsubscribe.
        let callbacks: Vec<StateChangedCallback> =
            self.state_changed_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(change);
        }
    }

    /// Dispatches a failure to every failure callback.
    pub fn dispatch_failure(&self, failure: &CommandFailure) {
        let callbacks: Vec<CommandFailedCallback> =
            self.command_failed_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(failure);
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_changed_callbacks.read().len() + self.command_failed_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
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
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
