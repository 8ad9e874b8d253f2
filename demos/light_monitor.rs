// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Demo program: list the lights of a control system, print every state
//! change, and optionally switch one light.
//!
//! # Usage
//!
//! ```bash
//! export CRESTRON_BASE_URL=http://192.168.1.20
//! export CRESTRON_AUTH_KEY=my-auth-key
//! cargo run --example light_monitor -- [<light id> on|off]
//! ```
//!
//! Runs until Ctrl-C.

use std::env;

use crestron_lights::subscription::Subscribable;
use crestron_lights::{ConnectionContext, LightPlatform, PollingConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let command = match args.as_slice() {
        [_] => None,
        [_, id, action] if action == "on" || action == "off" => Some((id.clone(), action.clone())),
        _ => {
            eprintln!("Usage: {} [<light id> on|off]", args[0]);
            eprintln!();
            eprintln!("Reads CRESTRON_BASE_URL and CRESTRON_AUTH_KEY from the environment.");
            std::process::exit(1);
        }
    };

    let context = ConnectionContext::from_env()?;
    println!("Connecting to {}...", context.base_url());

    let mut platform = LightPlatform::setup(context, PollingConfig::default()).await?;

    println!("Found {} light(s):", platform.lights().len());
    for light in platform.lights() {
        println!("  {} ({})", light.name(), light.identifier());
    }

    platform.on_state_changed(|change| {
        if change.is_transition() {
            println!("{}: {} -> {}", change.name, change.previous, change.state);
        }
    });
    platform.on_command_failed(|failure| {
        eprintln!(
            "{} failed for {}: {}",
            failure.operation, failure.light_id, failure.error
        );
    });

    platform.start();

    if let Some((id, action)) = command {
        match platform.light(&id) {
            Some(light) if action == "on" => light.turn_on().await?,
            Some(light) => light.turn_off().await?,
            None => eprintln!("No light with id {id}"),
        }
    }

    tokio::signal::ctrl_c().await?;
    platform.shutdown().await;

    Ok(())
}
