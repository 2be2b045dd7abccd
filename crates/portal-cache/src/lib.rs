// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side resource cache for the customer portal.
//!
//! Holds the signed-in customer's collections (profile, jobs, invoices,
//! membership, promotions, FAQs, service requests) as immutable snapshots,
//! refreshes them on demand with per-kind request coalescing, and notifies
//! subscribers after each change.

pub mod cache;
pub mod coalesce;
pub mod events;
pub mod snapshot;

pub use cache::ResourceCache;
pub use coalesce::Coalescer;
pub use events::{CacheEvent, EventBus};
pub use snapshot::{CacheSnapshot, Resource};
