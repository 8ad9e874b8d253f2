// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change and failure notifications.

use std::fmt;

use crate::types::LightState;

/// A per-light operation that talks to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `POST /cws/api/lights/{id}/on`
    TurnOn,
    /// `POST /cws/api/lights/{id}/off`
    TurnOff,
    /// `GET /cws/api/lights/{id}`
    RefreshState,
}

impl Operation {
    /// Returns the snake-case name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::RefreshState => "refresh_state",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The "state changed, re-render" notification for one light.
///
/// Emitted after every successful operation, including ones that leave the
/// state as it was (a repeated `turn_on`, or a poll that confirms the cache).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StateChange {
    /// Identifier of the light.
    pub light_id: String,
    /// Name of the light.
    pub name: String,
    /// Cached state before the operation.
    pub previous: LightState,
    /// Cached state after the operation.
    pub state: LightState,
}

impl StateChange {
    /// Creates a state change notification.
    #[must_use]
    pub fn new(
        light_id: impl Into<String>,
        name: impl Into<String>,
        previous: LightState,
        state: LightState,
    ) -> Self {
        Self {
            light_id: light_id.into(),
            name: name.into(),
            previous,
            state,
        }
    }

    /// Returns `true` if the cached state actually changed.
    #[must_use]
    pub fn is_transition(&self) -> bool {
        self.previous != self.state
    }
}

/// A failed per-light operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CommandFailure {
    /// Identifier of the light.
    pub light_id: String,
    /// The operation that failed.
    pub operation: Operation,
    /// Rendered error.
    pub error: String,
}

impl CommandFailure {
    /// Creates a failure notification.
    #[must_use]
    pub fn new(light_id: impl Into<String>, operation: Operation, error: impl fmt::Display) -> Self {
        Self {
            light_id: light_id.into(),
            operation,
            error: error.to_string(),
        }
    }
}
