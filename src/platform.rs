// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light platform setup.
//!
//! [`LightPlatform`] wires the pieces together the way a host integration
//! does: one transport, one directory poller, one shared callback registry,
//! and one [`Light`] per light reported by the first directory poll.
//!
//! Lights are bound once, at setup. Lights that appear in or disappear from
//! later polls are visible through [`DirectoryPoller::current_devices`] but
//! do not create or remove controllers.
//!
//! # Examples
//!
//! ```no_run
//! use crestron_lights::{ConnectionContext, LightPlatform, PollingConfig};
//! use crestron_lights::subscription::Subscribable;
//!
//! # async fn example() -> crestron_lights::Result<()> {
//! let context = ConnectionContext::from_env()?;
//! let mut platform = LightPlatform::setup(context, PollingConfig::default()).await?;
//!
//! platform.on_state_changed(|change| {
//!     println!("{} -> {}", change.name, change.state);
//! });
//! platform.start();
//!
//! if let Some(kitchen) = platform.light("L1") {
//!     kitchen.turn_on().await?;
//! }
//!
//! platform.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

#[cfg(feature = "http")]
use crate::config::ConnectionContext;
use crate::config::PollingConfig;
use crate::coordinator::{FirstTick, PollHandle};
use crate::directory::DirectoryPoller;
use crate::error::Result;
use crate::light::Light;
use crate::protocol::Protocol;
#[cfg(feature = "http")]
use crate::protocol::HttpClient;
use crate::state::{CommandFailure, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};

/// All lights of one control system plus their background polling.
#[derive(Debug)]
pub struct LightPlatform<P: Protocol> {
    polling: PollingConfig,
    poller: DirectoryPoller<P>,
    lights: Vec<Light<P>>,
    callbacks: Arc<CallbackRegistry>,
    tasks: Vec<PollHandle>,
}

#[cfg(feature = "http")]
impl LightPlatform<HttpClient> {
    /// Connects to the control system over HTTP and binds its lights.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created. A failed first directory poll is not an error;
    /// the platform then has no lights.
    pub async fn setup(context: ConnectionContext, polling: PollingConfig) -> Result<Self> {
        context.validate()?;
        let client = HttpClient::new(context)?;
        Self::with_protocol(Arc::new(client), polling).await
    }
}

impl<P: Protocol> LightPlatform<P> {
    /// Binds the lights reported by a first directory poll over `protocol`.
    ///
    /// # Errors
    ///
    /// Returns error if the polling configuration is invalid.
    pub async fn with_protocol(protocol: Arc<P>, polling: PollingConfig) -> Result<Self> {
        polling.validate()?;

        let poller = DirectoryPoller::new(Arc::clone(&protocol), polling.directory_interval);
        // Failures are logged by the coordinator; setup continues with no lights.
        let _ = poller.refresh().await;

        let devices = poller.current_devices();
        if devices.is_empty() {
            tracing::debug!("No lights found");
        } else {
            tracing::debug!(lights = ?devices, "Lights found");
        }

        let callbacks = Arc::new(CallbackRegistry::new());
        let lights = devices
            .into_iter()
            .map(|descriptor| Light::new(descriptor, Arc::clone(&protocol), Arc::clone(&callbacks)))
            .collect();

        Ok(Self {
            polling,
            poller,
            lights,
            callbacks,
            tasks: Vec::new(),
        })
    }

    /// Returns the bound lights, in directory order.
    #[must_use]
    pub fn lights(&self) -> &[Light<P>] {
        &self.lights
    }

    /// Returns the light with the given identifier.
    #[must_use]
    pub fn light(&self, id: &str) -> Option<&Light<P>> {
        self.lights.iter().find(|light| light.identifier() == id)
    }

    /// Returns the directory poller.
    #[must_use]
    pub fn poller(&self) -> &DirectoryPoller<P> {
        &self.poller
    }

    /// Returns the registry shared by every light.
    #[must_use]
    pub fn callbacks(&self) -> &Arc<CallbackRegistry> {
        &self.callbacks
    }

    /// Returns the polling configuration.
    #[must_use]
    pub fn polling(&self) -> PollingConfig {
        self.polling
    }

    /// Returns `true` while background polling is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Starts the directory poll loop and one state poll loop per light.
    ///
    /// The directory was just polled by setup, so its loop waits one interval;
    /// state loops start immediately to leave the unknown state. Calling
    /// `start` on a running platform does nothing.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        self.tasks
            .push(self.poller.spawn_with(FirstTick::AfterInterval));
        for light in &self.lights {
            self.tasks
                .push(light.spawn_refresh(self.polling.state_interval, FirstTick::Immediate));
        }

        tracing::info!(lights = self.lights.len(), "Light platform started");
    }

    /// Stops all background polling.
    pub async fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.stop().await;
        }
        tracing::info!("Light platform stopped");
    }
}

impl<P: Protocol> Subscribable for LightPlatform<P> {
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    fn on_command_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CommandFailure) + Send + Sync + 'static,
    {
        self.callbacks.on_command_failed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}
