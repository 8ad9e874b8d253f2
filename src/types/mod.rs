// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Crestron light control.
//!
//! # Types
//!
//! - [`LightState`] - Cached On/Off/Unknown state of one light
//! - [`DeviceDescriptor`] - Identity of one light as reported by the directory

mod device;
mod light_state;

pub use device::DeviceDescriptor;
pub use light_state::LightState;
