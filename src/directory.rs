// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device directory poller.
//!
//! Polls `GET /cws/api/lights` on a fixed cadence and keeps the last
//! successfully fetched list of lights.

use std::sync::Arc;
use std::time::Duration;

use crate::coordinator::{DataSource, FirstTick, PollHandle, UpdateCoordinator, UpdateStatus};
use crate::error::{Error, Result};
use crate::protocol::{Protocol, api};
use crate::response::LightsDirectory;
use crate::subscription::SubscriptionId;
use crate::types::DeviceDescriptor;

/// Name used for the directory poller in logs and errors.
pub const DIRECTORY_POLLER_NAME: &str = "Crestron Light";

/// [`DataSource`] fetching the light directory.
#[derive(Debug)]
pub struct LightsSource<P: Protocol> {
    protocol: Arc<P>,
}

impl<P: Protocol> LightsSource<P> {
    /// Creates a source using the given transport.
    #[must_use]
    pub fn new(protocol: Arc<P>) -> Self {
        Self { protocol }
    }
}

impl<P: Protocol> DataSource for LightsSource<P> {
    type Data = LightsDirectory;

    async fn fetch(&self) -> Result<LightsDirectory> {
        let response = self.protocol.get(api::LIGHTS_PATH).await?;
        let directory: LightsDirectory = response.parse()?;
        tracing::debug!(count = directory.len(), "Fetched light directory");
        Ok(directory)
    }
}

/// Keeps the current list of lights reported by the control system.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use crestron_lights::{ConnectionContext, DirectoryPoller};
/// use crestron_lights::protocol::HttpClient;
///
/// # async fn example() -> crestron_lights::Result<()> {
/// let client = Arc::new(HttpClient::new(ConnectionContext::new("http://10.0.0.5", "key"))?);
/// let poller = Arc::new(DirectoryPoller::new(client, Duration::from_secs(30)));
///
/// let _handle = poller.spawn();
/// for light in poller.current_devices() {
///     println!("{light}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DirectoryPoller<P: Protocol> {
    coordinator: Arc<UpdateCoordinator<LightsSource<P>>>,
}

impl<P: Protocol> DirectoryPoller<P> {
    /// Creates a poller. The list is empty until the first successful refresh.
    #[must_use]
    pub fn new(protocol: Arc<P>, interval: Duration) -> Self {
        Self {
            coordinator: Arc::new(UpdateCoordinator::new(
                DIRECTORY_POLLER_NAME,
                interval,
                LightsSource::new(protocol),
            )),
        }
    }

    /// Returns the most recently fetched lights, in API order.
    #[must_use]
    pub fn current_devices(&self) -> Vec<DeviceDescriptor> {
        self.coordinator.data().lights.clone()
    }

    /// Returns the most recently fetched directory without copying it.
    #[must_use]
    pub fn directory(&self) -> Arc<LightsDirectory> {
        self.coordinator.data()
    }

    /// Polls the directory once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateFailed`] if the request or parsing failed; the
    /// stored list is unchanged in that case.
    pub async fn refresh(&self) -> Result<Vec<DeviceDescriptor>> {
        let directory = self.coordinator.refresh().await?;
        Ok(directory.lights.clone())
    }

    /// Returns whether the most recent poll succeeded.
    #[must_use]
    pub fn last_update_success(&self) -> bool {
        self.coordinator.last_update_success()
    }

    /// Returns the poll bookkeeping.
    #[must_use]
    pub fn status(&self) -> UpdateStatus {
        self.coordinator.status()
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.coordinator.interval()
    }

    /// Starts polling, beginning immediately.
    #[must_use = "dropping the handle stops the poll loop"]
    pub fn spawn(&self) -> PollHandle {
        self.coordinator.spawn()
    }

    /// Starts polling with the given first tick.
    #[must_use = "dropping the handle stops the poll loop"]
    pub fn spawn_with(&self, first_tick: FirstTick) -> PollHandle {
        self.coordinator.spawn_with(first_tick)
    }

    /// Registers a callback run with the new list after each successful poll.
    pub fn on_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[DeviceDescriptor]) + Send + Sync + 'static,
    {
        self.coordinator
            .on_updated(move |directory: &LightsDirectory| callback(&directory.lights))
    }

    /// Registers a callback run after each failed poll.
    pub fn on_update_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.coordinator.on_update_failed(callback)
    }

    /// Removes a listener. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.coordinator.unsubscribe(id)
    }
}
