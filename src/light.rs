// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light controller.
//!
//! One [`Light`] is bound to one directory entry. It issues turn on, turn
//! off and state queries for that light only, and caches the state reported
//! by the last successful response.
//!
//! # Failure handling
//!
//! Every operation is attempted exactly once. A failure is logged, dispatched
//! to `on_command_failed` subscribers and returned to the caller; the cached
//! state is left as it was and no state change is emitted. A command that
//! fails therefore leaves the state stale until the next successful
//! [`refresh_state`](Light::refresh_state).
//!
//! # Ordering
//!
//! Each request takes a sequence number when it is issued. A response is only
//! applied if no later-issued request has already been applied, so a slow
//! state query cannot overwrite the result of a command sent after it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use crate::coordinator::{FirstTick, PollHandle, spawn_poll_loop};
use crate::error::{Error, Result};
use crate::protocol::{Protocol, api};
use crate::response::LightStateResponse;
use crate::state::{CommandFailure, Operation, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{DeviceDescriptor, LightState};

/// A single remotely controlled on/off light.
///
/// Cloning is cheap and clones share the cached state.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use crestron_lights::{ConnectionContext, Light};
/// use crestron_lights::protocol::HttpClient;
/// use crestron_lights::subscription::CallbackRegistry;
/// use crestron_lights::types::DeviceDescriptor;
///
/// # async fn example() -> crestron_lights::Result<()> {
/// let client = Arc::new(HttpClient::new(ConnectionContext::new("http://10.0.0.5", "key"))?);
/// let light = Light::new(
///     DeviceDescriptor::new("L1", "Kitchen"),
///     client,
///     Arc::new(CallbackRegistry::new()),
/// );
///
/// light.turn_on().await?;
/// assert!(light.is_on());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Light<P: Protocol> {
    descriptor: DeviceDescriptor,
    protocol: Arc<P>,
    state: Arc<RwLock<CachedState>>,
    issued: Arc<AtomicU64>,
    callbacks: Arc<CallbackRegistry>,
}

/// Cached state and the sequence number of the request that produced it.
#[derive(Debug, Clone, Copy, Default)]
struct CachedState {
    state: LightState,
    sequence: u64,
}

impl<P: Protocol> Clone for Light<P> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            protocol: Arc::clone(&self.protocol),
            state: Arc::clone(&self.state),
            issued: Arc::clone(&self.issued),
            callbacks: Arc::clone(&self.callbacks),
        }
    }
}

impl<P: Protocol> Light<P> {
    /// Binds a controller to a directory entry. The state starts as
    /// [`LightState::Unknown`].
    #[must_use]
    pub fn new(
        descriptor: DeviceDescriptor,
        protocol: Arc<P>,
        callbacks: Arc<CallbackRegistry>,
    ) -> Self {
        Self {
            descriptor,
            protocol,
            state: Arc::new(RwLock::new(CachedState::default())),
            issued: Arc::new(AtomicU64::new(0)),
            callbacks,
        }
    }

    /// Returns the light's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Returns the light's stable identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.descriptor.id
    }

    /// Returns the directory entry this light is bound to.
    #[must_use]
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// Returns the cached state.
    #[must_use]
    pub fn state(&self) -> LightState {
        self.state.read().state
    }

    /// Returns `true` only if the cached state is [`LightState::On`].
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state().is_on()
    }

    /// Returns the shared callback registry.
    #[must_use]
    pub fn callbacks(&self) -> &Arc<CallbackRegistry> {
        &self.callbacks
    }

    /// Turns the light on.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API does not answer `200 OK`.
    pub async fn turn_on(&self) -> Result<()> {
        let path = api::light_on_path(self.identifier());
        let sequence = self.next_sequence();
        let outcome = self.protocol.post(&path).await.map_err(Error::from);
        self.settle(Operation::TurnOn, sequence, outcome.map(|_| LightState::On))
            .map(|_| ())
    }

    /// Turns the light off.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API does not answer `200 OK`.
    pub async fn turn_off(&self) -> Result<()> {
        let path = api::light_off_path(self.identifier());
        let sequence = self.next_sequence();
        let outcome = self.protocol.post(&path).await.map_err(Error::from);
        self.settle(Operation::TurnOff, sequence, outcome.map(|_| LightState::Off))
            .map(|_| ())
    }

    /// Queries the light's state and caches it.
    ///
    /// Returns the cached state after the response is applied. If a command
    /// issued after this query has already completed, the query's answer is
    /// discarded and the command's state is returned.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the API does not answer `200 OK`,
    /// or the body has no `state` field.
    pub async fn refresh_state(&self) -> Result<LightState> {
        let path = api::light_path(self.identifier());
        let sequence = self.next_sequence();
        let outcome = match self.protocol.get(&path).await {
            Ok(response) => response
                .parse::<LightStateResponse>()
                .and_then(|body| body.light_state())
                .map_err(Error::from),
            Err(e) => Err(e.into()),
        };
        self.settle(Operation::RefreshState, sequence, outcome)
    }

    /// Starts querying the state on the given interval.
    #[must_use = "dropping the handle stops the poll loop"]
    pub fn spawn_refresh(&self, interval: Duration, first_tick: FirstTick) -> PollHandle {
        let light = self.clone();
        let name = format!("light {}", self.identifier());
        spawn_poll_loop(name, interval, first_tick, move || {
            let light = light.clone();
            async move {
                let _ = light.refresh_state().await;
            }
        })
    }

    fn next_sequence(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Applies the outcome of one operation to the cache and notifies.
    ///
    /// Returns the state held by the cache afterwards.
    fn settle(
        &self,
        operation: Operation,
        sequence: u64,
        outcome: Result<LightState>,
    ) -> Result<LightState> {
        match outcome {
            Ok(new_state) => {
                let previous = {
                    let mut cached = self.state.write();
                    if sequence < cached.sequence {
                        tracing::debug!(
                            light = %self.identifier(),
                            %operation,
                            sequence,
                            applied = cached.sequence,
                            "Discarding stale light response"
                        );
                        return Ok(cached.state);
                    }
                    let previous = cached.state;
                    *cached = CachedState {
                        state: new_state,
                        sequence,
                    };
                    previous
                };

                tracing::debug!(
                    light = %self.identifier(),
                    %operation,
                    %previous,
                    state = %new_state,
                    "Light state updated"
                );

                self.callbacks.dispatch(&StateChange::new(
                    self.identifier(),
                    self.name(),
                    previous,
                    new_state,
                ));
                Ok(new_state)
            }
            Err(err) => {
                tracing::error!(
                    light = %self.identifier(),
                    %operation,
                    error = %err,
                    "Light operation failed"
                );

                self.callbacks
                    .dispatch_failure(&CommandFailure::new(self.identifier(), operation, &err));
                Err(err)
            }
        }
    }
}

impl<P: Protocol> Subscribable for Light<P> {
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
