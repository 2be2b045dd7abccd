// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session's resource cache.
//!
//! Readers load the current [`CacheSnapshot`] lock-free through `ArcSwap`.
//! A refresh fetches one kind, swaps in a new snapshot with that kind
//! replaced, then publishes [`CacheEvent::Changed`]. A failed refresh leaves
//! the snapshot untouched and publishes [`CacheEvent::RefreshFailed`].

use std::sync::Arc;

use arc_swap::ArcSwap;
use portal_core::types::{Faq, Invoice, Job, Membership, Promotion, ServiceRequest, UserProfile};
use portal_core::{Api, PortalError, ResourceKind, TransportError};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::coalesce::Coalescer;
use crate::events::{CacheEvent, EventBus};
use crate::snapshot::{CacheSnapshot, Resource};

/// Session-scoped cache of backend collections.
///
/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone)]
pub struct ResourceCache {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    api: Api,
    snapshot: ArcSwap<CacheSnapshot>,
    refreshes: Coalescer<(u64, ResourceKind), Resource>,
    events: EventBus,
}

impl ResourceCache {
    pub fn new(api: Api, events: EventBus) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                snapshot: ArcSwap::from_pointee(CacheSnapshot::empty(0)),
                refreshes: Coalescer::new(),
                events,
            }),
        }
    }

    /// The current snapshot. Holding it does not block refreshes.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        self.inner.snapshot.load_full()
    }

    /// The current value of `kind`, or its empty value if never loaded.
    pub fn get(&self, kind: ResourceKind) -> Resource {
        self.inner.snapshot.load().get(kind)
    }

    pub fn user(&self) -> Option<Arc<UserProfile>> {
        self.inner.snapshot.load().user.clone()
    }

    pub fn jobs(&self) -> Arc<Vec<Job>> {
        Arc::clone(&self.inner.snapshot.load().jobs)
    }

    pub fn invoices(&self) -> Arc<Vec<Invoice>> {
        Arc::clone(&self.inner.snapshot.load().invoices)
    }

    pub fn membership(&self) -> Option<Arc<Membership>> {
        self.inner.snapshot.load().membership.clone()
    }

    pub fn promotions(&self) -> Arc<Vec<Promotion>> {
        Arc::clone(&self.inner.snapshot.load().promotions)
    }

    pub fn faqs(&self) -> Arc<Vec<Faq>> {
        Arc::clone(&self.inner.snapshot.load().faqs)
    }

    pub fn requests(&self) -> Arc<Vec<ServiceRequest>> {
        Arc::clone(&self.inner.snapshot.load().requests)
    }

    pub fn promotion_drafts(&self) -> Arc<Vec<Promotion>> {
        Arc::clone(&self.inner.snapshot.load().promotion_drafts)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Fetch `kind` from the backend and replace the cached value.
    ///
    /// Concurrent refreshes of the same kind share one request and one
    /// outcome. The fetch runs to completion even if the caller stops
    /// waiting. On failure the previously cached value is kept.
    ///
    /// A refresh started after [`reset`](Self::reset) never joins a fetch
    /// from before it.
    pub async fn refresh(&self, kind: ResourceKind) -> Result<Resource, PortalError> {
        let epoch = self.inner.snapshot.load().epoch();
        let inner = Arc::clone(&self.inner);
        self.inner
            .refreshes
            .run((epoch, kind), move || async move {
                inner.refresh_now(epoch, kind).await
            })
            .await
    }

    /// Record a locally composed promotion alongside the fetched ones.
    pub fn add_promotion_draft(&self, draft: Promotion) {
        debug!(id = %draft.id, title = %draft.title, "adding promotion draft");
        self.inner.snapshot.rcu(|current| current.with_draft(draft.clone()));
        self.inner.events.publish(CacheEvent::Changed {
            kind: ResourceKind::Promotions,
        });
    }

    /// Drop every cached value. Refreshes still in flight finish but their
    /// results are discarded.
    pub fn reset(&self) {
        let previous = self
            .inner
            .snapshot
            .rcu(|current| CacheSnapshot::empty(current.epoch() + 1));
        info!(epoch = previous.epoch() + 1, "resource cache reset");
        self.inner.events.publish(CacheEvent::Reset);
    }
}

impl Inner {
    async fn refresh_now(&self, epoch: u64, kind: ResourceKind) -> Result<Resource, PortalError> {
        debug!(%kind, epoch, "refreshing resource");

        match fetch(&self.api, kind).await {
            Ok(resource) => {
                if self.apply(epoch, &resource) {
                    info!(%kind, "resource refreshed");
                    self.events.publish(CacheEvent::Changed { kind });
                } else {
                    debug!(%kind, "discarding refresh from an ended session");
                }
                Ok(resource)
            }
            Err(error) => {
                warn!(%kind, error = %error, "refresh failed; keeping cached value");
                self.events.publish(CacheEvent::RefreshFailed {
                    kind,
                    error: error.clone(),
                });
                Err(error.into())
            }
        }
    }

    /// Swap in `resource` if the cache still belongs to session `epoch`.
    fn apply(&self, epoch: u64, resource: &Resource) -> bool {
        let mut applied = false;
        self.snapshot.rcu(|current| {
            applied = current.epoch() == epoch;
            if applied {
                Arc::new(current.with(resource.clone()))
            } else {
                Arc::clone(current)
            }
        });
        applied
    }
}

async fn fetch(api: &Api, kind: ResourceKind) -> Result<Resource, TransportError> {
    Ok(match kind {
        ResourceKind::User => Resource::User(Some(Arc::new(api.me().await?))),
        ResourceKind::Jobs => Resource::Jobs(Arc::new(api.jobs().await?)),
        ResourceKind::Invoices => Resource::Invoices(Arc::new(api.invoices().await?)),
        ResourceKind::Membership => Resource::Membership(api.membership().await?.map(Arc::new)),
        ResourceKind::Promotions => Resource::Promotions(Arc::new(api.promotions().await?)),
        ResourceKind::Faqs => Resource::Faqs(Arc::new(api.faqs().await?)),
        ResourceKind::Requests => Resource::Requests(Arc::new(api.requests().await?)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::Method;
    use portal_test_utils::{ScriptedTransport, fixtures};
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn failed_refresh_is_logged_with_kind() {
        let transport = ScriptedTransport::new().on(
            Method::Get,
            "/jobs",
            Err(TransportError::NetworkUnavailable("offline".into())),
        );
        let cache = ResourceCache::new(Api::new(Arc::new(transport)), EventBus::default());

        let _ = cache.refresh(ResourceKind::Jobs).await;

        assert!(logs_contain("refresh failed; keeping cached value"));
        assert!(logs_contain("kind=jobs"));
    }

    #[tokio::test]
    async fn refresh_all_kinds_populates_every_collection() {
        use strum::IntoEnumIterator;

        let cache = ResourceCache::new(Api::new(Arc::new(fixtures::backend())), EventBus::default());
        for kind in ResourceKind::iter() {
            cache.refresh(kind).await.unwrap();
        }

        let snapshot = cache.snapshot();
        assert!(ResourceKind::iter().all(|kind| snapshot.is_loaded(kind)));
        assert_eq!(snapshot.user.as_ref().map(|u| u.name.as_str()), Some("Jane Customer"));
        assert_eq!(snapshot.membership.as_ref().map(|m| m.plan.as_str()), Some("Gold"));
        assert_eq!(snapshot.requests.len(), 1);
    }
}
