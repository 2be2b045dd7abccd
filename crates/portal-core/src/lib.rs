// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the customer portal client.
//!
//! This crate provides the error taxonomy, the backend's wire types, the
//! [`Transport`] seam, the typed [`Api`] endpoint layer, and the pure
//! derived view functions used by every other portal crate.

pub mod api;
pub mod error;
pub mod traits;
pub mod types;
pub mod views;

// Re-export key items at crate root for ergonomic imports.
pub use api::Api;
pub use error::{PortalError, TransportError, ValidationError};
pub use traits::{SharedTransport, Transport};
pub use types::{JobId, LocalId, Method, ResourceKind, SenderRole};
