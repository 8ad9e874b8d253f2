// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that emit light notifications.

use crate::state::{CommandFailure, StateChange};
use crate::subscription::SubscriptionId;

/// Trait for types that support light notification subscriptions.
///
/// Implemented by [`Light`](crate::Light) and
/// [`LightPlatform`](crate::LightPlatform). Both delegate to the registry
/// shared by every light of the platform, so a subscription made through one
/// light also sees its siblings' notifications.
pub trait Subscribable {
    /// Subscribes to successful operations ("state changed, re-render").
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Subscribes to failed operations.
    fn on_command_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&CommandFailure) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
