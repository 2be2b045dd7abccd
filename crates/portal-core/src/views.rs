// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived view functions.
//!
//! Pure functions over cache snapshots. Results are never memoized; callers
//! recompute them from the latest snapshot whenever they render.

use crate::types::{Invoice, InvoiceStatus, Job, Promotion};

/// The upcoming job with the earliest scheduled time.
///
/// Only jobs that are still upcoming (`open` or `scheduled`) and carry a
/// timestamp are candidates. Equal timestamps resolve to the lowest id.
pub fn next_scheduled_job(jobs: &[Job]) -> Option<&Job> {
    jobs.iter()
        .filter(|job| job.status.is_upcoming())
        .filter_map(|job| job.scheduled_at.map(|at| (at, job.id, job)))
        .min_by_key(|(at, id, _)| (*at, *id))
        .map(|(_, _, job)| job)
}

/// Number of invoices still awaiting payment.
pub fn open_invoice_count(invoices: &[Invoice]) -> usize {
    invoices
        .iter()
        .filter(|inv| inv.status == InvoiceStatus::Open)
        .count()
}

/// Total amount due across open invoices, in dollars.
pub fn outstanding_balance(invoices: &[Invoice]) -> f64 {
    invoices
        .iter()
        .filter(|inv| inv.status == InvoiceStatus::Open)
        .map(|inv| inv.amount_due)
        .sum()
}

/// The promotion featured on the dashboard: the first one the backend lists.
pub fn latest_promotion(promotions: &[Promotion]) -> Option<&Promotion> {
    promotions.first()
}
