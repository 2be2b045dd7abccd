// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for portal client tests.
//!
//! Provides a scripted transport and sample payloads for fast,
//! deterministic tests without a running backend.
//!
//! # Components
//!
//! - [`ScriptedTransport`] - Per-route scripted replies with call recording
//! - [`Gate`] - Holds a scripted reply until the test releases it
//! - [`fixtures`] - Payloads shaped like the stub backend's responses

pub mod fixtures;
pub mod scripted;

pub use scripted::{Gate, RecordedCall, ScriptedTransport};
