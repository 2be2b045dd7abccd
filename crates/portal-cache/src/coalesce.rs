// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-key request coalescing.
//!
//! While work for a key is in flight, later callers for the same key attach
//! to it and receive the same outcome instead of issuing a second request.
//! The work itself runs on a spawned task, so it completes and applies its
//! result even if every caller stops waiting.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use portal_core::PortalError;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::{Instrument, debug, error};

type InFlight<T> = Shared<BoxFuture<'static, Result<T, PortalError>>>;

/// Deduplicates concurrent work by key.
pub struct Coalescer<K, T> {
    in_flight: Arc<Mutex<HashMap<K, InFlight<T>>>>,
}

impl<K, T> Default for Coalescer<K, T> {
    fn default() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, T> Debug for Coalescer<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coalescer").finish_non_exhaustive()
    }
}

impl<K, T> Coalescer<K, T>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `start()` for `key`, or join the run already in flight for it.
    ///
    /// `start` is only invoked when no run for `key` is in flight. The entry
    /// is removed once the run finishes, so the next call after completion
    /// starts fresh work.
    pub async fn run<F, Fut>(&self, key: K, start: F) -> Result<T, PortalError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, PortalError>> + Send + 'static,
    {
        let shared = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(existing) = in_flight.get(&key) {
                debug!(?key, "joining in-flight request");
                existing.clone()
            } else {
                let runtime = Handle::try_current().map_err(|e| {
                    PortalError::Internal(format!("no async runtime for background work: {e}"))
                })?;

                let registry = Arc::clone(&self.in_flight);
                let task_key = key.clone();
                let work = start();
                let handle = runtime.spawn(
                    async move {
                        let result = work.await;
                        registry.lock().await.remove(&task_key);
                        result
                    }
                    .in_current_span(),
                );

                let registry = Arc::clone(&self.in_flight);
                let join_key = key.clone();
                let shared = async move {
                    match handle.await {
                        Ok(result) => result,
                        Err(e) => {
                            error!(key = ?join_key, error = %e, "background request task failed");
                            registry.lock().await.remove(&join_key);
                            Err(PortalError::Internal(format!("background task failed: {e}")))
                        }
                    }
                }
                .boxed()
                .shared();

                in_flight.insert(key, shared.clone());
                shared
            }
        };
        shared.await
    }

    /// Whether work for `key` is currently in flight.
    pub async fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.lock().await.contains_key(key)
    }
}
