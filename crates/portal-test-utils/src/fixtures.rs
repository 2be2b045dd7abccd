// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample backend payloads shaped like the stub API's responses.

use serde_json::{Value, json};

use portal_core::Method;

use crate::scripted::ScriptedTransport;

pub fn user() -> Value {
    json!({
        "id": 1,
        "auth_uid": "firebase:abc123",
        "name": "Jane Customer",
        "email": "jane.customer@example.com",
        "phone": "555-0100"
    })
}

pub fn jobs() -> Value {
    json!([
        {
            "id": 101, "user_id": 1, "property_id": 1, "crm_ref": "JB-0001",
            "status": "open", "scheduled_at": "2025-11-15T10:00:00"
        },
        {
            "id": 102, "user_id": 1, "property_id": 1, "crm_ref": "JB-0002",
            "status": "past", "scheduled_at": "2025-10-01T09:00:00"
        }
    ])
}

pub fn invoices() -> Value {
    json!([
        {"id": 201, "job_id": 101, "crm_ref": "INV-001", "amount_due": 500.0, "status": "open"},
        {"id": 202, "job_id": 102, "crm_ref": "INV-002", "amount_due": 0.0, "status": "paid"}
    ])
}

pub fn membership() -> Value {
    json!({"id": 401, "plan": "Gold", "status": "active", "renews_at": "2026-01-01T00:00:00"})
}

pub fn promotions() -> Value {
    json!([
        {
            "id": 301, "title": "Winter Crawlspace Checkup",
            "body": "Get 15% off your next crawlspace inspection when scheduled before Dec 31.",
            "target_segment": "all"
        },
        {
            "id": 302, "title": "Member Appreciation",
            "body": "Members receive a free dehumidifier check with any service call this month.",
            "target_segment": "members"
        }
    ])
}

pub fn faqs() -> Value {
    json!([
        {"id": 1, "question": "Why is my crawlspace damp?", "answer": "High humidity and poor ventilation."},
        {"id": 2, "question": "Do you offer financing?", "answer": "Yes, with terms up to 5 years."}
    ])
}

pub fn requests() -> Value {
    json!([
        {
            "id": 1001, "status": "submitted", "submitted_at": "2025-10-20T14:30:00",
            "category": "waterproofing", "description": "Water in the basement"
        }
    ])
}

/// A confirmed message record as `POST /messages` would echo it.
pub fn message(id: i64, job_id: i64, sender: &str, text: &str) -> Value {
    json!({"id": id, "job_id": job_id, "sender": sender, "text": text, "media": []})
}

/// A transport answering every read route with the sample payloads.
pub fn backend() -> ScriptedTransport {
    ScriptedTransport::new()
        .on(Method::Get, "/me", Ok(user()))
        .on(Method::Get, "/jobs", Ok(jobs()))
        .on(Method::Get, "/invoices", Ok(invoices()))
        .on(Method::Get, "/membership", Ok(membership()))
        .on(Method::Get, "/promos", Ok(promotions()))
        .on(Method::Get, "/faqs", Ok(faqs()))
        .on(Method::Get, "/requests", Ok(requests()))
}
