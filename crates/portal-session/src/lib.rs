// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session context for the customer portal client.

pub mod dashboard;
pub mod session;

pub use dashboard::Dashboard;
pub use session::Session;
