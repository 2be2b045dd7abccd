// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Home dashboard projection.

use std::sync::Arc;

use portal_cache::CacheSnapshot;
use portal_core::types::{Job, Membership, Promotion, UserProfile};
use portal_core::views;

/// What the customer home screen shows, computed from one snapshot.
///
/// Built fresh on every call; never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub user: Option<Arc<UserProfile>>,
    pub next_job: Option<Job>,
    pub open_invoices: usize,
    pub outstanding_balance: f64,
    pub membership: Option<Arc<Membership>>,
    pub latest_promotion: Option<Promotion>,
}

impl Dashboard {
    pub fn from_snapshot(snapshot: &CacheSnapshot) -> Self {
        Self {
            user: snapshot.user.clone(),
            next_job: views::next_scheduled_job(&snapshot.jobs).cloned(),
            open_invoices: views::open_invoice_count(&snapshot.invoices),
            outstanding_balance: views::outstanding_balance(&snapshot.invoices),
            membership: snapshot.membership.clone(),
            latest_promotion: views::latest_promotion(&snapshot.promotions).cloned(),
        }
    }
}
