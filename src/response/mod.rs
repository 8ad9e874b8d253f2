// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for control-system API calls.
//!
//! Turn on and turn off answers carry no body worth parsing; only the
//! directory listing and the per-light state query are modelled here.

mod directory;
mod light;

pub use directory::LightsDirectory;
pub use light::LightStateResponse;
