// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `crestron_lights` - A Rust library to poll and control Crestron lights.
//!
//! This library talks to the REST API of a Crestron control system
//! (`/cws/api/lights`) to keep an in-memory view of every light's on/off
//! state and to turn lights on and off.
//!
//! # Components
//!
//! - [`DirectoryPoller`]: polls the light directory every 30 seconds and
//!   keeps the last good list
//! - [`Light`]: one controller per light; turn on, turn off, and state query
//! - [`LightPlatform`]: binds one [`Light`] per directory entry and runs
//!   the background polling
//! - [`UpdateCoordinator`](coordinator::UpdateCoordinator): the scheduled
//!   refresh abstraction the poller is built on
//!
//! # Quick Start
//!
//! ```no_run
//! use crestron_lights::{ConnectionContext, LightPlatform, PollingConfig};
//! use crestron_lights::subscription::Subscribable;
//!
//! #[tokio::main]
//! async fn main() -> crestron_lights::Result<()> {
//!     let context = ConnectionContext::new("http://192.168.1.20", "my-auth-key");
//!     let mut platform = LightPlatform::setup(context, PollingConfig::default()).await?;
//!
//!     // Re-render whenever a light reports a state
//!     platform.on_state_changed(|change| {
//!         println!("{} is {}", change.name, change.state);
//!     });
//!     platform.start();
//!
//!     for light in platform.lights() {
//!         light.turn_on().await?;
//!     }
//!
//!     platform.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Failures
//!
//! Directory poll failures keep the previous list. Command and state query
//! failures keep the previous cached state. Both are logged with `tracing`,
//! reported to subscribers, and returned to the caller; neither affects
//! other lights or the poller.

pub mod config;
pub mod coordinator;
mod directory;
pub mod error;
mod light;
mod platform;
pub mod protocol;
pub mod response;
pub mod state;
pub mod subscription;
pub mod types;

pub use config::{ConnectionContext, PollingConfig};
pub use coordinator::{DataSource, FirstTick, PollHandle, UpdateCoordinator, UpdateStatus};
pub use directory::{DIRECTORY_POLLER_NAME, DirectoryPoller, LightsSource};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result};
pub use light::Light;
pub use platform::LightPlatform;
#[cfg(feature = "http")]
pub use protocol::HttpClient;
pub use protocol::{ApiResponse, Protocol};
pub use response::{LightStateResponse, LightsDirectory};
pub use state::{CommandFailure, Operation, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{DeviceDescriptor, LightState};
