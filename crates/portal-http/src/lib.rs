// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport for the customer portal client.
//!
//! Implements [`Transport`](portal_core::Transport) over `reqwest` against
//! the configured backend base URL.

pub mod client;

pub use client::HttpTransport;
