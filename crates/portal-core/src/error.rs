// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the portal client.
//!
//! Every error here is `Clone` so that a single coalesced outcome can be
//! handed to every caller waiting on it.

use thiserror::Error;

use crate::types::{JobId, LocalId};

/// Failure of a single request/response exchange with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The backend could not be reached (DNS, connect, timeout, reset).
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body was not the JSON shape we expected.
    #[error("malformed response payload: {0}")]
    Decode(String),
}

impl TransportError {
    /// HTTP status code, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Input rejected locally before any transport call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Message text was empty after trimming whitespace.
    #[error("message text must not be empty")]
    EmptyMessage,

    /// A required text field was empty after trimming whitespace.
    #[error("`{field}` must not be empty")]
    EmptyField { field: &'static str },
}

/// The primary error type returned by cache, thread and session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    /// Configuration errors (bad base URL, client construction failure).
    #[error("configuration error: {0}")]
    Config(String),

    /// The request reached the transport layer and failed there.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request was rejected before reaching the transport layer.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No thread entry with this local id exists for the job.
    #[error("no message {local_id} in thread for job {job_id}")]
    UnknownMessage { job_id: JobId, local_id: LocalId },

    /// Only failed messages can be re-sent.
    #[error("message {local_id} is not in the failed state")]
    NotRetryable { local_id: LocalId },

    /// Internal or unexpected errors (a background task panicked).
    #[error("internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// Returns the underlying transport error, if any.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            PortalError::Transport(e) => Some(e),
            _ => None,
        }
    }
}
