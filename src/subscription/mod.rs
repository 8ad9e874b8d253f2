// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for light state changes.
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry shared by the lights of one platform
//! - [`Subscribable`] - Trait for types that accept subscriptions
//!
//! # Usage
//!
//! ```
//! use crestron_lights::subscription::CallbackRegistry;
//!
//! let registry = CallbackRegistry::new();
//! let sub_id = registry.on_state_changed(|change| {
//!     println!("{} is now {}", change.name, change.state);
//! });
//!
//! registry.unsubscribe(sub_id);
//! ```

pub(crate) mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
