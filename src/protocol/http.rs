// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for the control-system API.

use reqwest::{Client, Method, StatusCode};

use crate::config::ConnectionContext;
use crate::error::ProtocolError;
use crate::protocol::api::AUTH_HEADER;
use crate::protocol::{ApiResponse, Protocol};

/// HTTP client for the Crestron REST API.
///
/// Every request carries the `Crestron-RestAPI-AuthKey` header. Only
/// `200 OK` counts as success.
///
/// # Examples
///
/// ```no_run
/// use crestron_lights::ConnectionContext;
/// use crestron_lights::protocol::{HttpClient, Protocol, api};
///
/// # async fn example() -> crestron_lights::Result<()> {
/// let context = ConnectionContext::new("http://192.168.1.20", "secret");
/// let client = HttpClient::new(context)?;
/// let response = client.get(api::LIGHTS_PATH).await?;
/// println!("{}", response.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    context: ConnectionContext,
    client: Client,
}

impl HttpClient {
    /// Creates a client for the given connection context.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an HTTP(S) origin or the
    /// underlying client cannot be created.
    pub fn new(context: ConnectionContext) -> Result<Self, ProtocolError> {
        if !(context.base_url().starts_with("http://") || context.base_url().starts_with("https://"))
        {
            return Err(ProtocolError::InvalidAddress(context.base_url().to_string()));
        }

        let client = Client::builder()
            .timeout(context.timeout())
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self { context, client })
    }

    /// Returns the connection context.
    #[must_use]
    pub fn context(&self) -> &ConnectionContext {
        &self.context
    }

    /// Returns the base URL of the API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.context.base_url()
    }

    async fn send(&self, method: Method, path: &str) -> Result<ApiResponse, ProtocolError> {
        let url = self.context.url(path);

        tracing::debug!(%method, url = %url, "Sending HTTP request");

        let response = self
            .client
            .request(method, &url)
            .header(AUTH_HEADER, self.context.auth_key())
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProtocolError::UnexpectedStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::trace!(body = %body, "Received HTTP response");

        Ok(ApiResponse::new(body))
    }
}

impl Protocol for HttpClient {
    async fn get(&self, path: &str) -> Result<ApiResponse, ProtocolError> {
        self.send(Method::GET, path).await
    }

    async fn post(&self, path: &str) -> Result<ApiResponse, ProtocolError> {
        self.send(Method::POST, path).await
    }
}
