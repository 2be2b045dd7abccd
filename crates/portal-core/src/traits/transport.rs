// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait for a single request/response exchange with the backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::types::Method;

/// Performs exactly one HTTP exchange per call against the backend.
///
/// Implementations hold no cache and never retry. Every outcome, including
/// a non-2xx status, comes back as the `Result`; nothing panics past this
/// boundary. A successful response with an empty body yields `Value::Null`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Returns a short name for logs (e.g. `"http"`, `"scripted"`).
    fn name(&self) -> &str;

    /// Issues `method path` with an optional JSON body.
    ///
    /// `path` is relative to the backend base URL and may carry a query
    /// string, e.g. `/messages?job_id=101`.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError>;
}

/// Transport handle shared between the cache, the thread manager and
/// background tasks.
pub type SharedTransport = Arc<dyn Transport>;
