// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notifications emitted by light controllers.
//!
//! A [`StateChange`] is emitted once for every successful turn on, turn off
//! or state query. A [`CommandFailure`] is emitted for every failed one; the
//! cached state is left untouched in that case.
//!
//! # Examples
//!
//! ```
//! use crestron_lights::state::{Operation, StateChange};
//! use crestron_lights::types::LightState;
//!
//! let change = StateChange::new("L1", "Kitchen", LightState::Unknown, LightState::On);
//! assert!(change.is_transition());
//! assert_eq!(Operation::TurnOn.as_str(), "turn_on");
//! ```

mod state_change;

pub use state_change::{CommandFailure, Operation, StateChange};
