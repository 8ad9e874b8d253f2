// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light state type.

use std::fmt;

/// The cached on/off state of a light.
///
/// A light starts out [`Unknown`](Self::Unknown) and leaves that state on the
/// first successful command or query. It never returns to it.
///
/// # Examples
///
/// ```
/// use crestron_lights::types::LightState;
///
/// assert_eq!(LightState::default(), LightState::Unknown);
/// assert_eq!(LightState::from_api_value("on"), LightState::On);
/// assert_eq!(LightState::from_api_value("dimmed"), LightState::Off);
/// assert!(!LightState::Unknown.is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightState {
    /// The light is on.
    On,
    /// The light is off.
    Off,
    /// No successful response has been observed yet.
    #[default]
    Unknown,
}

impl LightState {
    /// Maps the API's `state` field: exactly `"on"` is on, anything else is off.
    #[must_use]
    pub fn from_api_value(value: &str) -> Self {
        if value == "on" { Self::On } else { Self::Off }
    }

    /// Returns `true` only for [`On`](Self::On).
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns `false` only for [`Unknown`](Self::Unknown).
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns the lowercase string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
