// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immutable cache snapshots.

use std::collections::HashSet;
use std::sync::Arc;

use portal_core::ResourceKind;
use portal_core::types::{Faq, Invoice, Job, Membership, Promotion, ServiceRequest, UserProfile};

/// The current value of one resource kind.
///
/// `User` is `None` before the first successful fetch. `Membership` is
/// `None` both before the first fetch and when the customer has no plan;
/// use [`CacheSnapshot::is_loaded`] to tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    User(Option<Arc<UserProfile>>),
    Jobs(Arc<Vec<Job>>),
    Invoices(Arc<Vec<Invoice>>),
    Membership(Option<Arc<Membership>>),
    Promotions(Arc<Vec<Promotion>>),
    Faqs(Arc<Vec<Faq>>),
    Requests(Arc<Vec<ServiceRequest>>),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::User(_) => ResourceKind::User,
            Self::Jobs(_) => ResourceKind::Jobs,
            Self::Invoices(_) => ResourceKind::Invoices,
            Self::Membership(_) => ResourceKind::Membership,
            Self::Promotions(_) => ResourceKind::Promotions,
            Self::Faqs(_) => ResourceKind::Faqs,
            Self::Requests(_) => ResourceKind::Requests,
        }
    }
}

/// Every cached collection at one instant.
///
/// Snapshots are never mutated once published; a refresh builds a new one
/// and swaps it in. Cloning is cheap because each collection sits behind an
/// `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    pub user: Option<Arc<UserProfile>>,
    pub jobs: Arc<Vec<Job>>,
    pub invoices: Arc<Vec<Invoice>>,
    pub membership: Option<Arc<Membership>>,
    pub promotions: Arc<Vec<Promotion>>,
    pub faqs: Arc<Vec<Faq>>,
    pub requests: Arc<Vec<ServiceRequest>>,
    /// Promotions composed locally that have not been published anywhere.
    pub promotion_drafts: Arc<Vec<Promotion>>,
    loaded: HashSet<ResourceKind>,
    epoch: u64,
}

impl CacheSnapshot {
    /// An empty snapshot for the session numbered `epoch`.
    pub(crate) fn empty(epoch: u64) -> Self {
        Self {
            epoch,
            ..Self::default()
        }
    }

    /// Whether `kind` has been fetched successfully at least once.
    pub fn is_loaded(&self, kind: ResourceKind) -> bool {
        self.loaded.contains(&kind)
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn get(&self, kind: ResourceKind) -> Resource {
        match kind {
            ResourceKind::User => Resource::User(self.user.clone()),
            ResourceKind::Jobs => Resource::Jobs(Arc::clone(&self.jobs)),
            ResourceKind::Invoices => Resource::Invoices(Arc::clone(&self.invoices)),
            ResourceKind::Membership => Resource::Membership(self.membership.clone()),
            ResourceKind::Promotions => Resource::Promotions(Arc::clone(&self.promotions)),
            ResourceKind::Faqs => Resource::Faqs(Arc::clone(&self.faqs)),
            ResourceKind::Requests => Resource::Requests(Arc::clone(&self.requests)),
        }
    }

    /// A copy of this snapshot with `resource` replacing its kind.
    pub(crate) fn with(&self, resource: Resource) -> Self {
        let mut next = self.clone();
        next.loaded.insert(resource.kind());
        match resource {
            Resource::User(user) => next.user = user,
            Resource::Jobs(jobs) => next.jobs = jobs,
            Resource::Invoices(invoices) => next.invoices = invoices,
            Resource::Membership(membership) => next.membership = membership,
            Resource::Promotions(promotions) => next.promotions = promotions,
            Resource::Faqs(faqs) => next.faqs = faqs,
            Resource::Requests(requests) => next.requests = requests,
        }
        next
    }

    pub(crate) fn with_draft(&self, draft: Promotion) -> Self {
        let mut next = self.clone();
        let mut drafts = Vec::clone(&self.promotion_drafts);
        drafts.push(draft);
        next.promotion_drafts = Arc::new(drafts);
        next
    }
}
