// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener registry for coordinator refreshes.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Error;
use crate::subscription::SubscriptionId;
use crate::subscription::callback::IdGenerator;

type UpdatedCallback<D> = Arc<dyn Fn(&D) + Send + Sync>;

type FailedCallback = Arc<dyn Fn(&Error) + Send + Sync>;

/// Callbacks notified after each refresh attempt.
pub(crate) struct UpdateListeners<D> {
    ids: IdGenerator,
    updated: RwLock<HashMap<SubscriptionId, UpdatedCallback<D>>>,
    failed: RwLock<HashMap<SubscriptionId, FailedCallback>>,
}

impl<D: 'static> UpdateListeners<D> {
    pub(crate) fn new() -> Self {
        Self {
            ids: IdGenerator::new(),
            updated: RwLock::new(HashMap::new()),
            failed: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn on_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&D) + Send + Sync + 'static,
    {
        let id = self.ids.next();
        self.updated.write().insert(id, Arc::new(callback));
        id
    }

    pub(crate) fn on_update_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        let id = self.ids.next();
        self.failed.write().insert(id, Arc::new(callback));
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.updated.write().remove(&id).is_some() {
            return true;
        }
        self.failed.write().remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.updated.read().len() + self.failed.read().len()
    }

    pub(crate) fn dispatch_updated(&self, data: &D) {
        let callbacks: Vec<UpdatedCallback<D>> = self.updated.read().values().cloned().collect();
        for callback in callbacks {
            callback(data);
        }
    }

    pub(crate) fn dispatch_failed(&self, error: &Error) {
        let callbacks: Vec<FailedCallback> = self.failed.read().values().cloned().collect();
        for callback in callbacks {
            callback(error);
        }
    }
}
