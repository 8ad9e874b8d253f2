// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementations for talking to the Crestron control-system API.
//!
//! - [`Protocol`]: the transport seam used by the poller and the controllers
//! - [`HttpClient`]: reqwest-backed implementation (feature `http`)
//! - [`api`]: REST paths of the light endpoints

pub mod api;
#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpClient;

use std::future::Future;

use crate::error::{ParseError, ProtocolError};

/// Successful (`200 OK`) response from the API.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    body: String,
}

impl ApiResponse {
    /// Creates a response with the given body.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body as JSON into the target type.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON cannot be parsed into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}

/// Transport used to reach the control-system API.
///
/// Implementations attach the auth header and treat anything other than
/// `200 OK` as an error. No retries are performed.
pub trait Protocol: Send + Sync + 'static {
    /// Sends `GET {base_url}{path}`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport failure or a non-200 status.
    fn get(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<ApiResponse, ProtocolError>> + Send;

    /// Sends `POST {base_url}{path}` with an empty body.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport failure or a non-200 status.
    fn post(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<ApiResponse, ProtocolError>> + Send;
}
