// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-cadence background polling.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// When the first tick of a poll loop fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstTick {
    /// Fire as soon as the loop starts.
    #[default]
    Immediate,
    /// Fire one interval after the loop starts.
    AfterInterval,
}

/// Handle to a running poll loop.
///
/// Dropping the handle aborts the loop; [`stop`](Self::stop) ends it after
/// any in-flight tick completes.
#[derive(Debug)]
pub struct PollHandle {
    name: String,
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Returns the name of the loop.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` while the loop task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Signals the loop to stop and waits for it to exit.
    pub async fn stop(mut self) {
        let _ = self.stop.send(true);
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
            && e.is_panic()
        {
            tracing::error!(name = %self.name, "Poll loop panicked");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawns a task calling `tick` every `interval`, regardless of outcome.
///
/// Missed ticks are delayed rather than bursted, so a slow request never
/// causes back-to-back polls.
pub(crate) fn spawn_poll_loop<F, Fut>(
    name: impl Into<String>,
    interval: Duration,
    first_tick: FirstTick,
    mut tick: F,
) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let name = name.into();
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let start = match first_tick {
        FirstTick::Immediate => Instant::now(),
        FirstTick::AfterInterval => Instant::now() + interval,
    };

    let loop_name = name.clone();
    let task = tokio::spawn(async move {
        tracing::debug!(name = %loop_name, ?interval, "Starting poll loop");

        let mut ticker = tokio::time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => tick().await,
                _ = stop_rx.changed() => break,
            }
        }

        tracing::debug!(name = %loop_name, "Poll loop stopped");
    });

    PollHandle {
        name,
        stop: stop_tx,
        task: Some(task),
    }
}
