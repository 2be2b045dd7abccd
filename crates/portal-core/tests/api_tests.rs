// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the typed endpoint layer.

use std::sync::Arc;

use portal_core::types::{
    InvoiceId, JobStatus, MessageId, NewServiceRequest, OutgoingMessage, RequestId,
    ServiceCategory,
};
use portal_core::{Api, JobId, Method, SenderRole, TransportError};
use portal_test_utils::{ScriptedTransport, fixtures};
use serde_json::json;

fn client(transport: ScriptedTransport) -> (Api, Arc<ScriptedTransport>) {
    let transport = Arc::new(transport);
    (Api::new(transport.clone()), transport)
}

#[tokio::test]
async fn reads_sample_collections() {
    let (api, _) = client(fixtures::backend());

    let user = api.me().await.unwrap();
    assert_eq!(user.name, "Jane Customer");
    assert_eq!(user.phone.as_deref(), Some("555-0100"));

    let jobs = api.jobs().await.unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[1].status, JobStatus::Past);

    let invoices = api.invoices().await.unwrap();
    assert_eq!(invoices[0].amount_due, 500.0);

    assert_eq!(api.promotions().await.unwrap().len(), 2);
    assert_eq!(api.faqs().await.unwrap().len(), 2);
    assert_eq!(api.requests().await.unwrap()[0].id, RequestId(1001));
}

#[tokio::test]
async fn missing_membership_is_absence_not_error() {
    let (api, _) = client(ScriptedTransport::new().on(
        Method::Get,
        "/membership",
        Err(TransportError::HttpError {
            status: 404,
            body: "{\"detail\":\"Not Found\"}".into(),
        }),
    ));
    assert_eq!(api.membership().await.unwrap(), None);

    let (api, _) = client(ScriptedTransport::new().on(Method::Get, "/membership", Ok(json!(null))));
    assert_eq!(api.membership().await.unwrap(), None);

    let (api, _) = client(fixtures::backend());
    assert_eq!(api.membership().await.unwrap().unwrap().plan, "Gold");
}

#[tokio::test]
async fn membership_server_error_is_still_an_error() {
    let (api, _) = client(ScriptedTransport::new().on(
        Method::Get,
        "/membership",
        Err(TransportError::HttpError {
            status: 500,
            body: String::new(),
        }),
    ));
    assert!(api.membership().await.is_err());
}

#[tokio::test]
async fn absent_message_endpoint_degrades_to_empty_history() {
    // Unscripted routes answer 404.
    let (api, transport) = client(ScriptedTransport::new());
    assert!(api.messages(JobId(101)).await.unwrap().is_empty());
    assert_eq!(transport.calls(Method::Get, "/messages?job_id=101").await, 1);

    let (api, _) = client(ScriptedTransport::new().on(
        Method::Get,
        "/messages?job_id=101",
        Err(TransportError::HttpError {
            status: 405,
            body: "{\"detail\":\"Method Not Allowed\"}".into(),
        }),
    ));
    assert!(api.messages(JobId(101)).await.unwrap().is_empty());
}

#[tokio::test]
async fn message_history_network_failure_is_an_error() {
    let (api, _) = client(ScriptedTransport::new().on(
        Method::Get,
        "/messages?job_id=101",
        Err(TransportError::NetworkUnavailable("connection refused".into())),
    ));
    assert!(matches!(
        api.messages(JobId(101)).await,
        Err(TransportError::NetworkUnavailable(_))
    ));
}

#[tokio::test]
async fn post_message_sends_wire_body() {
    let (api, transport) = client(ScriptedTransport::new().on(
        Method::Post,
        "/messages",
        Ok(fixtures::message(7, 101, "customer", "Hello")),
    ));

    let record = api
        .post_message(&OutgoingMessage {
            job_id: JobId(101),
            sender: SenderRole::Customer,
            text: "Hello".into(),
            media: Vec::new(),
        })
        .await
        .unwrap();

    assert_eq!(record.id, MessageId(7));
    let recorded = transport.recorded().await;
    assert_eq!(
        recorded[0].body,
        Some(json!({"job_id": 101, "sender": "customer", "text": "Hello", "media": []}))
    );
}

#[tokio::test]
async fn pay_invoice_and_create_request() {
    let (api, transport) = client(
        ScriptedTransport::new()
            .on(
                Method::Post,
                "/invoices/201/pay",
                Ok(json!({"client_secret": "pi_1234_secret_ABC"})),
            )
            .on(
                Method::Post,
                "/requests",
                Ok(json!({
                    "id": 1001, "status": "submitted", "submitted_at": "2025-10-20T14:30:00.123456",
                    "category": "attic_solutions", "description": "Loud noises"
                })),
            ),
    );

    let intent = api.pay_invoice(InvoiceId(201)).await.unwrap();
    assert_eq!(intent.client_secret, "pi_1234_secret_ABC");

    let created = api
        .create_request(&NewServiceRequest {
            category: ServiceCategory::AtticSolutions,
            description: "Loud noises".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, RequestId(1001));
    assert!(created.submitted_at.is_some());

    let recorded = transport.recorded().await;
    assert_eq!(recorded[0].body, None);
    assert_eq!(
        recorded[1].body,
        Some(json!({"category": "attic_solutions", "description": "Loud noises"}))
    );
}

#[tokio::test]
async fn single_job_lookup() {
    let (api, _) = client(ScriptedTransport::new().on(
        Method::Get,
        "/jobs/101",
        Ok(json!({"id": 101, "status": "open", "scheduled_at": "2025-11-15T10:00:00"})),
    ));
    assert_eq!(api.job(JobId(101)).await.unwrap().unwrap().id, JobId(101));
    assert_eq!(api.job(JobId(999)).await.unwrap(), None);
}

#[tokio::test]
async fn malformed_payload_is_decode_error() {
    let (api, _) = client(ScriptedTransport::new().on(Method::Get, "/jobs", Ok(json!({"jobs": []}))));
    assert!(matches!(api.jobs().await, Err(TransportError::Decode(_))));
}
