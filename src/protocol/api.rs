// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! REST paths of the light endpoints.

/// Header carrying the API auth key on every request.
pub const AUTH_HEADER: &str = "Crestron-RestAPI-AuthKey";

/// Directory listing of all lights.
pub const LIGHTS_PATH: &str = "/cws/api/lights";

/// State query path for one light.
#[must_use]
pub fn light_path(id: &str) -> String {
    format!("{LIGHTS_PATH}/{}", urlencoding::encode(id))
}

/// Turn-on path for one light.
#[must_use]
pub fn light_on_path(id: &str) -> String {
    format!("{}/on", light_path(id))
}

/// Turn-off path for one light.
#[must_use]
pub fn light_off_path(id: &str) -> String {
    format!("{}/off", light_path(id))
}
