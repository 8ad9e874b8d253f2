// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device descriptor type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one light as reported by the directory endpoint.
///
/// Only `id` and `name` are read; any other fields in the directory entry
/// are ignored.
///
/// # Examples
///
/// ```
/// use crestron_lights::types::DeviceDescriptor;
///
/// let light: DeviceDescriptor =
///     serde_json::from_str(r#"{"id": "L1", "name": "Kitchen", "level": 0}"#).unwrap();
/// assert_eq!(light.id, "L1");
/// assert_eq!(light.name, "Kitchen");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Stable identifier, unique within the directory.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Human-readable label.
    pub name: String,
}

impl DeviceDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

// Some controllers report numeric ids.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_extra_fields() {
        let light: DeviceDescriptor = serde_json::from_str(
            r#"{"id": "L7", "name": "Hallway", "roomId": 3, "level": 65535}"#,
        )
        .unwrap();
        assert_eq!(light, DeviceDescriptor::new("L7", "Hallway"));
    }

    #[test]
    fn numeric_id_becomes_string() {
        let light: DeviceDescriptor =
            serde_json::from_str(r#"{"id": 1042, "name": "Porch"}"#).unwrap();
        assert_eq!(light.id, "1042");
    }

    #[test]
    fn missing_name_is_an_error() {
        let result = serde_json::from_str::<DeviceDescriptor>(r#"{"id": "L1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn display() {
        assert_eq!(
            DeviceDescriptor::new("L1", "Kitchen").to_string(),
            "Kitchen (L1)"
        );
    }
}
