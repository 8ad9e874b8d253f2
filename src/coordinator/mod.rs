// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scheduled refresh of shared data.
//!
//! An [`UpdateCoordinator`] owns a refresh interval, a [`DataSource`] that
//! fetches the data, the last successfully fetched value, and listeners that
//! are told about every attempt. It knows nothing about any host framework.
//!
//! # Data visibility
//!
//! Fetched data is stored as an `Arc` and swapped wholesale, so readers see
//! either the previous value or the new one, never a partial update. A failed
//! refresh leaves the stored value untouched.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use crestron_lights::coordinator::{DataSource, UpdateCoordinator};
//!
//! struct Counter;
//!
//! impl DataSource for Counter {
//!     type Data = Vec<u32>;
//!
//!     async fn fetch(&self) -> crestron_lights::Result<Vec<u32>> {
//!         Ok(vec![1, 2, 3])
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> crestron_lights::Result<()> {
//! let coordinator = UpdateCoordinator::new("counter", Duration::from_secs(30), Counter);
//! assert!(coordinator.data().is_empty());
//!
//! coordinator.refresh().await?;
//! assert_eq!(*coordinator.data(), vec![1, 2, 3]);
//! # Ok(())
//! # }
//! ```

mod handle;
mod listeners;

pub use handle::{FirstTick, PollHandle};
pub(crate) use handle::spawn_poll_loop;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::subscription::SubscriptionId;
use listeners::UpdateListeners;

/// Something an [`UpdateCoordinator`] can refresh from.
pub trait DataSource: Send + Sync + 'static {
    /// The fetched value. `Default` is what readers see before the first
    /// successful refresh.
    type Data: Default + Send + Sync + 'static;

    /// Fetches a fresh value. Called exactly once per refresh; no retries.
    ///
    /// # Errors
    ///
    /// Any error marks the refresh as failed.
    fn fetch(&self) -> impl Future<Output = Result<Self::Data>> + Send;
}

/// Outcome bookkeeping of the most recent refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatus {
    /// Whether the most recent refresh succeeded. `true` before the first one.
    pub last_update_success: bool,
    /// Rendered error of the most recent failed refresh, cleared on success.
    pub last_error: Option<String>,
    /// When the stored data was last replaced.
    pub last_update_time: Option<DateTime<Utc>>,
}

impl Default for UpdateStatus {
    fn default() -> Self {
        Self {
            last_update_success: true,
            last_error: None,
            last_update_time: None,
        }
    }
}

/// Periodically refreshes data from a [`DataSource`].
pub struct UpdateCoordinator<S: DataSource> {
    name: String,
    interval: Duration,
    source: S,
    data: RwLock<Arc<S::Data>>,
    status: RwLock<UpdateStatus>,
    listeners: UpdateListeners<S::Data>,
}

impl<S: DataSource> UpdateCoordinator<S> {
    /// Creates a coordinator. Nothing is fetched until [`refresh`](Self::refresh)
    /// or [`spawn`](Self::spawn) is called.
    #[must_use]
    pub fn new(name: impl Into<String>, interval: Duration, source: S) -> Self {
        Self {
            name: name.into(),
            interval,
            source,
            data: RwLock::new(Arc::new(S::Data::default())),
            status: RwLock::new(UpdateStatus::default()),
            listeners: UpdateListeners::new(),
        }
    }

    /// Returns the coordinator name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the refresh interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the data source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the last successfully fetched data.
    #[must_use]
    pub fn data(&self) -> Arc<S::Data> {
        Arc::clone(&self.data.read())
    }

    /// Returns a snapshot of the refresh bookkeeping.
    #[must_use]
    pub fn status(&self) -> UpdateStatus {
        self.status.read().clone()
    }

    /// Returns whether the most recent refresh succeeded.
    #[must_use]
    pub fn last_update_success(&self) -> bool {
        self.status.read().last_update_success
    }

    /// Fetches once and stores the result.
    ///
    /// On success the stored data is replaced and `on_updated` listeners are
    /// notified. On failure the stored data is kept and `on_update_failed`
    /// listeners are notified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateFailed`] if the fetch failed.
    pub async fn refresh(&self) -> Result<Arc<S::Data>> {
        match self.source.fetch().await {
            Ok(data) => {
                let data = Arc::new(data);
                *self.data.write() = Arc::clone(&data);

                let recovered = {
                    let mut status = self.status.write();
                    let recovered = !status.last_update_success;
                    status.last_update_success = true;
                    status.last_error = None;
                    status.last_update_time = Some(Utc::now());
                    recovered
                };

                if recovered {
                    tracing::info!(name = %self.name, "Fetching data recovered");
                }
                tracing::debug!(name = %self.name, "Finished fetching data");

                self.listeners.dispatch_updated(&data);
                Ok(data)
            }
            Err(err) => {
                let err = Error::update_failed(&self.name, &err);

                let first_failure = {
                    let mut status = self.status.write();
                    let first_failure = status.last_update_success;
                    status.last_update_success = false;
                    status.last_error = Some(err.to_string());
                    first_failure
                };

                // Log the first failure loudly; repeats until recovery stay at debug.
                if first_failure {
                    tracing::warn!(name = %self.name, error = %err, "Refresh failed");
                } else {
                    tracing::debug!(name = %self.name, error = %err, "Refresh still failing");
                }

                self.listeners.dispatch_failed(&err);
                Err(err)
            }
        }
    }

    /// Registers a callback run after each successful refresh.
    pub fn on_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&S::Data) + Send + Sync + 'static,
    {
        self.listeners.on_updated(callback)
    }

    /// Registers a callback run after each failed refresh.
    pub fn on_update_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.listeners.on_update_failed(callback)
    }

    /// Removes a listener. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Starts refreshing on the interval, beginning immediately.
    #[must_use = "dropping the handle stops the poll loop"]
    pub fn spawn(self: &Arc<Self>) -> PollHandle {
        self.spawn_with(FirstTick::Immediate)
    }

    /// Starts refreshing on the interval with the given first tick.
    #[must_use = "dropping the handle stops the poll loop"]
    pub fn spawn_with(self: &Arc<Self>, first_tick: FirstTick) -> PollHandle {
        let coordinator = Arc::clone(self);
        spawn_poll_loop(self.name.clone(), self.interval, first_tick, move || {
            let coordinator = Arc::clone(&coordinator);
            async move {
                // Failures are already logged and dispatched.
                let _ = coordinator.refresh().await;
            }
        })
    }
}

impl<S: DataSource> std::fmt::Debug for UpdateCoordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateCoordinator")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .field("status", &*self.status.read())
            .field("listener_count", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
