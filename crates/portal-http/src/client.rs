// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport for the portal backend.
//!
//! Provides [`HttpTransport`] which handles URL construction, JSON bodies,
//! and mapping of every outcome into a [`TransportError`]. Each call is one
//! attempt; callers decide whether to try again.

use std::time::Duration;

use async_trait::async_trait;
use portal_config::ApiConfig;
use portal_core::{Method, PortalError, Transport, TransportError};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};

/// `reqwest`-backed [`Transport`] against a configurable base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PortalError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PortalError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a transport from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self, PortalError> {
        Self::new(&config.base_url, config.timeout())
    }

    /// The base URL every path is resolved against, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let url = self.url(path);
        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, url = %url, error = %e, "request did not reach the backend");
            TransportError::NetworkUnavailable(format!("{method} {url}: {e}"))
        })?;

        let status = response.status();
        debug!(%method, path, status = %status, "response received");

        let bytes = response.bytes().await.map_err(|e| {
            TransportError::NetworkUnavailable(format!("failed to read response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(TransportError::HttpError {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
