// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed endpoint layer over a [`Transport`](crate::Transport).
//!
//! Maps each backend route to its request/response types and folds the
//! "valid absence" cases (no membership, no message history endpoint) into
//! `Ok` values so nothing above this layer has to inspect status codes.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::TransportError;
use crate::traits::SharedTransport;
use crate::types::{
    Faq, Invoice, InvoiceId, Job, JobId, Membership, MessageRecord, Method, NewServiceRequest,
    OutgoingMessage, PaymentIntent, Promotion, ServiceRequest, UserProfile,
};

/// Typed client for the portal backend routes.
#[derive(Clone)]
pub struct Api {
    transport: SharedTransport,
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api")
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl Api {
    pub fn new(transport: SharedTransport) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    /// `GET /me`
    pub async fn me(&self) -> Result<UserProfile, TransportError> {
        self.get("/me").await
    }

    /// `GET /jobs`
    pub async fn jobs(&self) -> Result<Vec<Job>, TransportError> {
        self.get("/jobs").await
    }

    /// `GET /jobs/{id}`; an unknown job is `None`.
    pub async fn job(&self, id: JobId) -> Result<Option<Job>, TransportError> {
        match self.get(&format!("/jobs/{id}")).await {
            Ok(job) => Ok(Some(job)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `GET /invoices`
    pub async fn invoices(&self) -> Result<Vec<Invoice>, TransportError> {
        self.get("/invoices").await
    }

    /// `POST /invoices/{id}/pay`. Completing the payment is not our concern.
    pub async fn pay_invoice(&self, id: InvoiceId) -> Result<PaymentIntent, TransportError> {
        self.post(&format!("/invoices/{id}/pay"), None).await
    }

    /// `GET /membership`; a 404 or a `null` body means "no membership".
    pub async fn membership(&self) -> Result<Option<Membership>, TransportError> {
        match self.get::<Option<Membership>>("/membership").await {
            Ok(membership) => Ok(membership),
            Err(e) if e.is_not_found() => {
                debug!("no membership on record");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// `GET /promos`
    pub async fn promotions(&self) -> Result<Vec<Promotion>, TransportError> {
        self.get("/promos").await
    }

    /// `GET /faqs`
    pub async fn faqs(&self) -> Result<Vec<Faq>, TransportError> {
        self.get("/faqs").await
    }

    /// `GET /requests`
    pub async fn requests(&self) -> Result<Vec<ServiceRequest>, TransportError> {
        self.get("/requests").await
    }

    /// `POST /requests`
    pub async fn create_request(
        &self,
        request: &NewServiceRequest,
    ) -> Result<ServiceRequest, TransportError> {
        self.post("/requests", Some(encode(request)?)).await
    }

    /// `GET /messages?job_id=`.
    ///
    /// Deployments may not serve this route at all; that degrades to an
    /// empty history instead of an error.
    pub async fn messages(&self, job_id: JobId) -> Result<Vec<MessageRecord>, TransportError> {
        match self
            .get::<Option<Vec<MessageRecord>>>(&format!("/messages?job_id={job_id}"))
            .await
        {
            Ok(records) => Ok(records.unwrap_or_default()),
            Err(e) if endpoint_absent(&e) => {
                debug!(job_id = %job_id, status = ?e.status(), "message history endpoint absent");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// `POST /messages`
    pub async fn post_message(
        &self,
        message: &OutgoingMessage,
    ) -> Result<MessageRecord, TransportError> {
        self.post("/messages", Some(encode(message)?)).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let value = self.transport.request(Method::Get, path, None).await?;
        decode(value)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, TransportError> {
        let value = self.transport.request(Method::Post, path, body).await?;
        decode(value)
    }
}

/// True for statuses meaning "this route is not served here".
pub fn endpoint_absent(err: &TransportError) -> bool {
    matches!(err.status(), Some(404 | 405 | 501))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, TransportError> {
    serde_json::from_value(value).map_err(|e| TransportError::Decode(e.to_string()))
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value, TransportError> {
    serde_json::to_value(value).map_err(|e| TransportError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_statuses() {
        let status = |status| TransportError::HttpError {
            status,
            body: String::new(),
        };
        assert!(endpoint_absent(&status(404)));
        assert!(endpoint_absent(&status(405)));
        assert!(endpoint_absent(&status(501)));
        assert!(!endpoint_absent(&status(500)));
        assert!(!endpoint_absent(&TransportError::NetworkUnavailable("down".into())));
    }

    #[test]
    fn decode_reports_shape_errors() {
        let err = decode::<Vec<Job>>(serde_json::json!({"not": "a list"})).unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }
}
