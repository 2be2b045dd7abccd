// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change notifications for cache and thread subscribers.
//!
//! Events are published only after the state change they describe has been
//! swapped in, so a subscriber reacting to an event always reads the new
//! snapshot.

use portal_core::{JobId, ResourceKind, TransportError};
use tokio::sync::broadcast;
use tracing::trace;

/// Default number of events buffered per subscriber before it lags.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A state change consumers may want to re-render on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// The collection for `kind` was replaced.
    Changed { kind: ResourceKind },
    /// A refresh of `kind` failed; the previous value is still cached.
    RefreshFailed {
        kind: ResourceKind,
        error: TransportError,
    },
    /// The message thread for `job_id` changed (append, settle, or load).
    ThreadChanged { job_id: JobId },
    /// Loading the thread for `job_id` failed; the local thread is unchanged.
    ThreadLoadFailed { job_id: JobId, error: TransportError },
    /// The session ended and all cached state was dropped.
    Reset,
}

/// Broadcast channel shared by the resource cache and the thread manager.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CacheEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: CacheEvent) {
        trace!(?event, "publishing cache event");
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
