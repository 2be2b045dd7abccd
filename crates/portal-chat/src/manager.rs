// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-job message threads with optimistic send.
//!
//! A send appends a pending entry immediately, publishes
//! [`CacheEvent::ThreadChanged`], and delivers the message on a background
//! task. The outcome settles the same entry in place: confirmed with the
//! server id, or failed with the reason. Failed entries stay in the thread
//! until retried.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use portal_cache::{CacheEvent, Coalescer, EventBus};
use portal_core::types::OutgoingMessage;
use portal_core::{Api, JobId, LocalId, PortalError, SenderRole, ValidationError};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, warn};

use crate::merge::merge_history;
use crate::message::{DeliveryState, ThreadMessage};

/// An immutable view of one job's thread.
pub type Thread = Arc<Vec<ThreadMessage>>;

#[derive(Debug, Clone, Default)]
struct Book {
    epoch: u64,
    threads: HashMap<JobId, Thread>,
}

impl Book {
    fn thread(&self, job_id: JobId) -> Thread {
        self.threads.get(&job_id).cloned().unwrap_or_default()
    }

    fn with_thread(&self, job_id: JobId, thread: Vec<ThreadMessage>) -> Self {
        let mut next = self.clone();
        next.threads.insert(job_id, Arc::new(thread));
        next
    }
}

/// Handle to a message delivery running in the background.
///
/// Dropping it does not cancel the delivery.
#[derive(Debug)]
pub struct Delivery {
    local_id: LocalId,
    handle: JoinHandle<DeliveryState>,
}

impl Delivery {
    /// Identity of the thread entry being delivered.
    pub fn local_id(&self) -> LocalId {
        self.local_id
    }

    /// Wait for the entry to leave the pending state.
    pub async fn settled(self) -> Result<DeliveryState, PortalError> {
        self.handle
            .await
            .map_err(|e| PortalError::Internal(format!("delivery task failed: {e}")))
    }
}

/// Owns every message thread for the session.
///
/// Cheap to clone; clones share the same threads.
#[derive(Debug, Clone)]
pub struct ThreadManager {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    api: Api,
    book: ArcSwap<Book>,
    next_local: AtomicU64,
    loads: Coalescer<(u64, JobId), Thread>,
    events: EventBus,
}

impl ThreadManager {
    pub fn new(api: Api, events: EventBus) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                book: ArcSwap::from_pointee(Book::default()),
                next_local: AtomicU64::new(1),
                loads: Coalescer::new(),
                events,
            }),
        }
    }

    /// The current thread for `job_id`; empty if nothing was sent or loaded.
    pub fn thread(&self, job_id: JobId) -> Thread {
        self.inner.book.load().thread(job_id)
    }

    /// Jobs with a thread, in ascending id order.
    pub fn job_ids(&self) -> Vec<JobId> {
        let mut ids: Vec<_> = self.inner.book.load().threads.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    /// Send a text message to the thread for `job_id`.
    ///
    /// Whitespace-only text is rejected before anything is appended or sent.
    /// Otherwise a pending entry is visible in [`thread`](Self::thread) by
    /// the time this returns.
    pub fn send(
        &self,
        job_id: JobId,
        sender: SenderRole,
        text: &str,
    ) -> Result<Delivery, PortalError> {
        self.send_with_media(job_id, sender, text, Vec::new())
    }

    /// Like [`send`](Self::send) with media URLs attached.
    pub fn send_with_media(
        &self,
        job_id: JobId,
        sender: SenderRole,
        text: &str,
        media: Vec<String>,
    ) -> Result<Delivery, PortalError> {
        let text = text.trim();
        if text.is_empty() {
            debug!(%job_id, "rejecting empty message");
            return Err(ValidationError::EmptyMessage.into());
        }
        let runtime = background_runtime()?;

        let local_id = self.inner.allocate();
        let entry = ThreadMessage::pending(local_id, job_id, sender, text.to_string(), media);
        let previous = self.inner.book.rcu(|book| {
            let mut thread = Vec::clone(&book.thread(job_id));
            thread.push(entry.clone());
            book.with_thread(job_id, thread)
        });
        debug!(%job_id, %local_id, sender = %entry.sender, "message queued");
        self.inner.events.publish(CacheEvent::ThreadChanged { job_id });

        Ok(self.inner.spawn_delivery(&runtime, previous.epoch, entry))
    }

    /// Re-send a failed entry in place, keeping its text and position.
    pub fn retry(&self, job_id: JobId, local_id: LocalId) -> Result<Delivery, PortalError> {
        let runtime = background_runtime()?;

        let mut outcome = Err(PortalError::UnknownMessage { job_id, local_id });
        self.inner.book.rcu(|book| {
            let thread = book.thread(job_id);
            let Some(entry) = thread.iter().find(|m| m.local_id == local_id) else {
                outcome = Err(PortalError::UnknownMessage { job_id, local_id });
                return Arc::clone(book);
            };
            if !entry.state.is_failed() {
                outcome = Err(PortalError::NotRetryable { local_id });
                return Arc::clone(book);
            }

            let mut resent = entry.clone();
            resent.state = DeliveryState::Pending;
            outcome = Ok((book.epoch, resent.clone()));
            let next: Vec<_> = thread
                .iter()
                .map(|m| {
                    if m.local_id == local_id {
                        resent.clone()
                    } else {
                        m.clone()
                    }
                })
                .collect();
            Arc::new(book.with_thread(job_id, next))
        });

        let (epoch, entry) = outcome?;
        info!(%job_id, %local_id, "retrying message");
        self.inner.events.publish(CacheEvent::ThreadChanged { job_id });
        Ok(self.inner.spawn_delivery(&runtime, epoch, entry))
    }

    /// Fetch the history for `job_id` and merge it into the local thread.
    ///
    /// Concurrent loads of the same job share one request. On failure the
    /// local thread is left unchanged. A load started after
    /// [`reset`](Self::reset) never joins one from before it.
    ///
    /// Confirmed entries take the server's order and pending or failed
    /// entries follow them in submission order. A confirmed entry sent
    /// after a failed one therefore moves ahead of it on load.
    pub async fn load(&self, job_id: JobId) -> Result<Thread, PortalError> {
        let epoch = self.inner.book.load().epoch;
        let inner = Arc::clone(&self.inner);
        self.inner
            .loads
            .run((epoch, job_id), move || async move {
                inner.load_now(epoch, job_id).await
            })
            .await
    }

    /// Drop every thread. Deliveries and loads still in flight finish but
    /// no longer touch the threads.
    pub fn reset(&self) {
        let previous = self.inner.book.rcu(|book| Book {
            epoch: book.epoch + 1,
            threads: HashMap::new(),
        });
        info!(threads = previous.threads.len(), "message threads cleared");
    }
}

impl Inner {
    fn allocate(&self) -> LocalId {
        LocalId(self.next_local.fetch_add(1, Ordering::Relaxed))
    }

    fn spawn_delivery(
        self: &Arc<Self>,
        runtime: &Handle,
        epoch: u64,
        entry: ThreadMessage,
    ) -> Delivery {
        let local_id = entry.local_id;
        let inner = Arc::clone(self);
        let handle = runtime.spawn(async move { inner.deliver(epoch, entry).await }.in_current_span());
        Delivery { local_id, handle }
    }

    async fn deliver(&self, epoch: u64, entry: ThreadMessage) -> DeliveryState {
        let ThreadMessage {
            local_id,
            job_id,
            sender,
            text,
            media,
            ..
        } = entry;
        let outgoing = OutgoingMessage {
            job_id,
            sender,
            text,
            media,
        };

        let state = match self.api.post_message(&outgoing).await {
            Ok(record) => {
                info!(%job_id, %local_id, message_id = %record.id, "message confirmed");
                DeliveryState::Confirmed { id: record.id }
            }
            Err(e) => {
                warn!(%job_id, %local_id, error = %e, "message send failed");
                DeliveryState::Failed {
                    reason: e.to_string(),
                }
            }
        };

        if self.settle(epoch, job_id, local_id, &state) {
            self.events.publish(CacheEvent::ThreadChanged { job_id });
        } else {
            debug!(%job_id, %local_id, "discarding delivery outcome for a cleared thread");
        }
        state
    }

    /// Replace the state of `local_id` in place.
    ///
    /// A load that finished first may already hold the confirmed message
    /// under a fresh local id; that copy is dropped.
    fn settle(&self, epoch: u64, job_id: JobId, local_id: LocalId, state: &DeliveryState) -> bool {
        let mut settled = false;
        self.book.rcu(|book| {
            let thread = book.thread(job_id);
            settled = book.epoch == epoch && thread.iter().any(|m| m.local_id == local_id);
            if !settled {
                return Arc::clone(book);
            }
            let confirmed = state.server_id();
            let next: Vec<_> = thread
                .iter()
                .filter(|m| m.local_id == local_id || confirmed.is_none() || m.server_id() != confirmed)
                .map(|m| {
                    let mut m = m.clone();
                    if m.local_id == local_id {
                        m.state = state.clone();
                    }
                    m
                })
                .collect();
            Arc::new(book.with_thread(job_id, next))
        });
        settled
    }

    async fn load_now(&self, epoch: u64, job_id: JobId) -> Result<Thread, PortalError> {
        debug!(%job_id, epoch, "loading message history");

        let records = match self.api.messages(job_id).await {
            Ok(records) => records,
            Err(e) => {
                warn!(%job_id, error = %e, "message history load failed; keeping local thread");
                self.events.publish(CacheEvent::ThreadLoadFailed {
                    job_id,
                    error: e.clone(),
                });
                return Err(e.into());
            }
        };

        let mut merged: Option<Thread> = None;
        self.book.rcu(|book| {
            if book.epoch != epoch {
                merged = None;
                return Arc::clone(book);
            }
            let next = book.with_thread(
                job_id,
                merge_history(&book.thread(job_id), job_id, &records, || self.allocate()),
            );
            merged = Some(next.thread(job_id));
            Arc::new(next)
        });

        match merged {
            Some(thread) => {
                info!(%job_id, messages = thread.len(), "message history loaded");
                self.events.publish(CacheEvent::ThreadChanged { job_id });
                Ok(thread)
            }
            None => {
                debug!(%job_id, "discarding history for a cleared thread");
                Ok(self.book.load().thread(job_id))
            }
        }
    }
}

fn background_runtime() -> Result<Handle, PortalError> {
    Handle::try_current()
        .map_err(|e| PortalError::Internal(format!("no async runtime for message delivery: {e}")))
}
