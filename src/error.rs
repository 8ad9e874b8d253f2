// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `crestron_lights` library.
//!
//! Failures fall into four groups: transport and status failures talking to
//! the control-system API, malformed response bodies, invalid configuration,
//! and failed coordinator refreshes.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while talking to the control-system API.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response body.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The connection or polling configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A scheduled refresh did not produce new data.
    #[error("error fetching {name} data: {reason}")]
    UpdateFailed {
        /// Name of the coordinator that failed.
        name: String,
        /// Description of the underlying failure.
        reason: String,
    },
}

impl Error {
    /// Wraps any error as a failed refresh of the named coordinator.
    pub(crate) fn update_failed(name: &str, err: &Error) -> Self {
        Self::UpdateFailed {
            name: name.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Errors related to HTTP communication with the control-system API.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed before a status was received.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with something other than `200 OK`.
    #[error("unexpected status {status} ({reason})")]
    UnexpectedStatus {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase, if known.
        reason: String,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ProtocolError {
    /// Returns the HTTP status code if the API answered with one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors related to parsing API responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),
}

/// Errors related to loading and validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set or empty.
    #[error("environment variable {0} is not set")]
    MissingVariable(String),

    /// A configuration value failed validation.
    #[error("invalid {field}: {message}")]
    InvalidValue {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON.
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
