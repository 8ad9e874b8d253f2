// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Directory listing response parsing.

use serde::Deserialize;

use crate::types::DeviceDescriptor;

/// Response from `GET /cws/api/lights`.
///
/// The API wraps the list in an object:
///
/// ```json
/// {"lights": [{"id": "L1", "name": "Kitchen"}]}
/// ```
///
/// A body without a `lights` field is an empty directory.
///
/// # Examples
///
/// ```
/// use crestron_lights::response::LightsDirectory;
///
/// let json = r#"{"lights": [{"id": "L1", "name": "Kitchen"}]}"#;
/// let directory: LightsDirectory = serde_json::from_str(json).unwrap();
/// assert_eq!(directory.lights.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LightsDirectory {
    /// Lights in the order the API reported them.
    #[serde(default)]
    pub lights: Vec<DeviceDescriptor>,
}

impl LightsDirectory {
    /// Returns `true` if the directory reported no lights.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Returns the number of lights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lights.len()
    }
}
