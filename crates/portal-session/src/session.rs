// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The signed-in customer's session.
//!
//! A [`Session`] owns the resource cache and the thread manager for one
//! sign-in, shares one event bus between them, and offers the one-shot
//! actions (paying an invoice, submitting a service request) that do not
//! live in the cache. Ending the session drops all cached state.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use futures::future::join_all;
use portal_cache::{CacheEvent, EventBus, Resource, ResourceCache};
use portal_chat::ThreadManager;
use portal_config::PortalConfig;
use portal_core::types::{
    InvoiceId, NewServiceRequest, PaymentIntent, Promotion, PromotionId, ServiceCategory,
    ServiceRequest,
};
use portal_core::{Api, PortalError, ResourceKind, SharedTransport, ValidationError};
use portal_http::HttpTransport;
use strum::IntoEnumIterator;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::dashboard::Dashboard;

/// Session context shared by every screen of the client.
#[derive(Debug)]
pub struct Session {
    api: Api,
    cache: ResourceCache,
    threads: ThreadManager,
    events: EventBus,
    next_draft: AtomicI64,
}

impl Session {
    /// Creates a session over an existing transport.
    pub fn new(transport: SharedTransport) -> Self {
        let api = Api::new(transport);
        let events = EventBus::default();
        Self {
            cache: ResourceCache::new(api.clone(), events.clone()),
            threads: ThreadManager::new(api.clone(), events.clone()),
            api,
            events,
            next_draft: AtomicI64::new(-1),
        }
    }

    /// Creates a session talking HTTP to the configured backend.
    pub fn from_config(config: &PortalConfig) -> Result<Self, PortalError> {
        let transport = HttpTransport::from_config(&config.api)?;
        info!(base_url = %transport.base_url(), "session started");
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    pub fn threads(&self) -> &ThreadManager {
        &self.threads
    }

    /// Subscribe to cache and thread change events.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Refresh every resource kind concurrently.
    ///
    /// Each kind succeeds or fails on its own; one failure does not stop
    /// the others.
    pub async fn refresh_all(&self) -> Vec<(ResourceKind, Result<Resource, PortalError>)> {
        let refreshes = ResourceKind::iter().map(|kind| async move {
            let result = self.cache.refresh(kind).await;
            (kind, result)
        });
        let results = join_all(refreshes).await;

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        if failed > 0 {
            warn!(failed, total = results.len(), "some resources could not be refreshed");
        } else {
            debug!(total = results.len(), "all resources refreshed");
        }
        results
    }

    /// The home dashboard, computed from the current snapshot.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::from_snapshot(&self.cache.snapshot())
    }

    /// Start paying an invoice. The cache is not touched; refresh
    /// invoices once the payment completes.
    pub async fn pay_invoice(&self, id: InvoiceId) -> Result<PaymentIntent, PortalError> {
        debug!(invoice_id = %id, "creating payment intent");
        let intent = self.api.pay_invoice(id).await?;
        info!(invoice_id = %id, "payment intent created");
        Ok(intent)
    }

    /// Submit a service request, then refresh the `requests` collection.
    ///
    /// A failed follow-up refresh is logged but does not fail the
    /// submission.
    pub async fn submit_request(
        &self,
        category: ServiceCategory,
        description: &str,
    ) -> Result<ServiceRequest, PortalError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "description",
            }
            .into());
        }

        let created = self
            .api
            .create_request(&NewServiceRequest {
                category,
                description: description.to_string(),
            })
            .await?;
        info!(request_id = %created.id, %category, "service request submitted");

        if let Err(e) = self.cache.refresh(ResourceKind::Requests).await {
            warn!(error = %e, "requests refresh after submission failed");
        }
        Ok(created)
    }

    /// Compose a promotion locally.
    ///
    /// The backend has no route to create promotions, so drafts live only
    /// in this session's `promotion_drafts` list and are lost when it ends.
    /// An empty segment targets everyone.
    pub fn draft_promotion(
        &self,
        title: &str,
        body: &str,
        segment: &str,
    ) -> Result<Promotion, PortalError> {
        let title = title.trim();
        let body = body.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyField { field: "title" }.into());
        }
        if body.is_empty() {
            return Err(ValidationError::EmptyField { field: "body" }.into());
        }
        let segment = match segment.trim() {
            "" => "all",
            s => s,
        };

        let draft = Promotion {
            id: PromotionId(self.next_draft.fetch_sub(1, Ordering::Relaxed)),
            title: title.to_string(),
            body: body.to_string(),
            target_segment: segment.to_string(),
            active_from: None,
            active_to: None,
        };
        warn!(id = %draft.id, title = %draft.title, "promotion draft kept locally; it is not persisted");
        self.cache.add_promotion_draft(draft.clone());
        Ok(draft)
    }

    /// End the session, dropping every cached resource and thread.
    pub fn end(self) {
        self.threads.reset();
        self.cache.reset();
        info!("session ended");
    }
}
