// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light state query response parsing.

use serde::Deserialize;

use crate::error::ParseError;
use crate::types::LightState;

/// Response from `GET /cws/api/lights/{id}`.
///
/// # Examples
///
/// ```
/// use crestron_lights::response::LightStateResponse;
/// use crestron_lights::types::LightState;
///
/// let response: LightStateResponse = serde_json::from_str(r#"{"state": "on"}"#).unwrap();
/// assert_eq!(response.light_state().unwrap(), LightState::On);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LightStateResponse {
    /// Raw `state` value as reported by the API.
    #[serde(default)]
    pub state: Option<String>,
}

impl LightStateResponse {
    /// Maps the raw value to a [`LightState`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] if the body has no `state`.
    pub fn light_state(&self) -> Result<LightState, ParseError> {
        self.state
            .as_deref()
            .map(LightState::from_api_value)
            .ok_or_else(|| ParseError::MissingField("state".to_string()))
    }
}
