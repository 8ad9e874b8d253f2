// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection and polling configuration.
//!
//! A [`ConnectionContext`] is created once at startup and passed explicitly to
//! every component that talks to the control-system API. It is never mutated
//! after construction.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use crestron_lights::ConnectionContext;
//!
//! let context = ConnectionContext::new("http://192.168.1.20/", "secret-key")
//!     .with_timeout(Duration::from_secs(5));
//!
//! assert_eq!(context.base_url(), "http://192.168.1.20");
//! assert_eq!(context.auth_key(), "secret-key");
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable holding the API origin.
pub const ENV_BASE_URL: &str = "CRESTRON_BASE_URL";
/// Environment variable holding the API auth key.
pub const ENV_AUTH_KEY: &str = "CRESTRON_AUTH_KEY";
/// Optional environment variable overriding the request timeout (seconds).
pub const ENV_TIMEOUT_SECS: &str = "CRESTRON_TIMEOUT_SECS";

/// Origin and credentials of the control-system API.
///
/// Cheap to clone and shared read-only by the directory poller and every
/// light controller.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    base_url: String,
    auth_key: String,
    timeout: Duration,
}

impl ConnectionContext {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a context for the given API origin and auth key.
    ///
    /// A trailing `/` on `base_url` is removed.
    #[must_use]
    pub fn new(base_url: impl Into<String>, auth_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            auth_key: auth_key.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads the context from `CRESTRON_BASE_URL`, `CRESTRON_AUTH_KEY` and
    /// the optional `CRESTRON_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] if a required variable is
    /// unset or empty, or [`ConfigError::InvalidValue`] if a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
        };

        let mut context = Self::new(required(ENV_BASE_URL)?, required(ENV_AUTH_KEY)?);

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("timeout_secs", format!("not a number: {raw}")))?;
            context = context.with_timeout(Duration::from_secs(secs));
        }

        context.validate()?;
        Ok(context)
    }

    /// Loads the context from a JSON file.
    ///
    /// ```json
    /// { "base_url": "http://192.168.1.20", "auth_key": "secret", "timeout_secs": 5 }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let context = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded connection configuration");
        Ok(context)
    }

    /// Parses the context from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConnectionContext = serde_json::from_str(json)?;
        let mut context = Self::new(raw.base_url, raw.auth_key);
        if let Some(secs) = raw.timeout_secs {
            context = context.with_timeout(Duration::from_secs(secs));
        }
        context.validate()?;
        Ok(context)
    }

    /// Checks that the base URL is an HTTP(S) origin and the auth key is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "base_url",
                "must start with http:// or https://",
            ));
        }
        if self.auth_key.trim().is_empty() {
            return Err(ConfigError::invalid("auth_key", "must not be empty"));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::invalid("timeout", "must be greater than zero"));
        }
        Ok(())
    }

    /// Returns the API origin, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the opaque auth key sent with every request.
    #[must_use]
    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Joins an API path onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionContext")
            .field("base_url", &self.base_url)
            .field("auth_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Deserialize)]
struct RawConnectionContext {
    base_url: String,
    auth_key: String,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

/// Refresh cadences for the directory poller and per-light state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Interval between directory polls.
    pub directory_interval: Duration,
    /// Interval between per-light state queries.
    pub state_interval: Duration,
}

impl PollingConfig {
    /// Default cadence for both loops.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

    /// Sets the directory poll interval.
    #[must_use]
    pub fn with_directory_interval(mut self, interval: Duration) -> Self {
        self.directory_interval = interval;
        self
    }

    /// Sets the per-light state query interval.
    #[must_use]
    pub fn with_state_interval(mut self, interval: Duration) -> Self {
        self.state_interval = interval;
        self
    }

    /// Rejects zero intervals.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if either interval is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directory_interval.is_zero() {
            return Err(ConfigError::invalid(
                "directory_interval",
                "must be greater than zero",
            ));
        }
        if self.state_interval.is_zero() {
            return Err(ConfigError::invalid(
                "state_interval",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            directory_interval: Self::DEFAULT_INTERVAL,
            state_interval: Self::DEFAULT_INTERVAL,
        }
    }
}
