// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-job message threads for the customer portal client.
//!
//! [`ThreadManager`] keeps one ordered thread per job, sends messages
//! optimistically, lets failed messages be retried in place, and merges
//! fetched history without losing unconfirmed local entries.

pub mod manager;
mod merge;
pub mod message;

pub use manager::{Delivery, Thread, ThreadManager};
pub use message::{DeliveryState, ThreadMessage};
