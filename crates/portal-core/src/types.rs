// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire and domain types shared across the portal client.
//!
//! Field names follow the backend's JSON. Status enums keep unknown values
//! in an `Other` variant because the backend owns those enumerations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

macro_rules! backend_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

backend_id!(
    /// Backend identifier of a user.
    UserId
);
backend_id!(
    /// Backend identifier of a job.
    JobId
);
backend_id!(
    /// Backend identifier of an invoice.
    InvoiceId
);
backend_id!(
    /// Backend identifier of a membership record.
    MembershipId
);
backend_id!(
    /// Backend identifier of a promotion.
    PromotionId
);
backend_id!(
    /// Backend identifier of an FAQ entry.
    FaqId
);
backend_id!(
    /// Backend identifier of a submitted service request.
    RequestId
);
backend_id!(
    /// Backend-assigned identity of a confirmed chat message.
    MessageId
);

/// Client-assigned identity of a thread entry.
///
/// Allocated monotonically per thread manager, so it also records
/// submission order. Never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalId(pub u64);

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "local-{}", self.0)
    }
}

/// HTTP method used by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

/// One of the named backend-sourced collections held by the resource cache.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Jobs,
    Invoices,
    Membership,
    Promotions,
    Faqs,
    Requests,
}

/// Lifecycle status of a job. The enumeration is backend-defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Open,
    Scheduled,
    Completed,
    Canceled,
    Past,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Scheduled => "scheduled",
            JobStatus::Completed => "completed",
            JobStatus::Canceled => "canceled",
            JobStatus::Past => "past",
            JobStatus::Other(s) => s,
        }
    }

    /// True while the job still has a visit ahead of it.
    pub fn is_upcoming(&self) -> bool {
        matches!(self, JobStatus::Open | JobStatus::Scheduled)
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => JobStatus::Open,
            "scheduled" => JobStatus::Scheduled,
            "completed" => JobStatus::Completed,
            "canceled" | "cancelled" => JobStatus::Canceled,
            "past" => JobStatus::Past,
            _ => JobStatus::Other(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        match value {
            JobStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    Open,
    Paid,
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Open => "open",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Other(s) => s,
        }
    }
}

impl From<String> for InvoiceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => InvoiceStatus::Open,
            "paid" => InvoiceStatus::Paid,
            _ => InvoiceStatus::Other(value),
        }
    }
}

impl From<InvoiceStatus> for String {
    fn from(value: InvoiceStatus) -> Self {
        match value {
            InvoiceStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who authored a chat message. Roles the client does not know are kept
/// verbatim so one odd record cannot fail a whole history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SenderRole {
    Customer,
    Staff,
    Other(String),
}

impl SenderRole {
    pub fn as_str(&self) -> &str {
        match self {
            SenderRole::Customer => "customer",
            SenderRole::Staff => "staff",
            SenderRole::Other(s) => s,
        }
    }
}

impl From<String> for SenderRole {
    fn from(value: String) -> Self {
        match value.as_str() {
            "customer" => SenderRole::Customer,
            "staff" => SenderRole::Staff,
            _ => SenderRole::Other(value),
        }
    }
}

impl From<SenderRole> for String {
    fn from(value: SenderRole) -> Self {
        match value {
            SenderRole::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SenderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service categories offered on the request form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    CrawlspaceRepairs,
    StructuralRepairs,
    Waterproofing,
    MoldRemediation,
    AtticSolutions,
}

/// The signed-in customer's profile. Singleton per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A unit of field work for the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default, with = "timestamp::option")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub crm_ref: Option<String>,
    #[serde(default)]
    pub property_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub crm_ref: Option<String>,
    /// Amount due in dollars.
    pub amount_due: f64,
    pub status: InvoiceStatus,
}

/// Membership plan details. Absent when the customer has no plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(default)]
    pub id: Option<MembershipId>,
    pub plan: String,
    pub status: String,
    #[serde(default, with = "timestamp::option")]
    pub renews_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: PromotionId,
    pub title: String,
    pub body: String,
    pub target_segment: String,
    #[serde(default, with = "timestamp::option")]
    pub active_from: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub active_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
}

/// Body of `POST /requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewServiceRequest {
    pub category: ServiceCategory,
    pub description: String,
}

/// A service request as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: RequestId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Response of `POST /invoices/{id}/pay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub client_secret: String,
}

/// A chat message as the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub job_id: JobId,
    pub sender: SenderRole,
    pub text: String,
    #[serde(default)]
    pub media: Option<Vec<String>>,
}

/// Body of `POST /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub job_id: JobId,
    pub sender: SenderRole,
    pub text: String,
    pub media: Vec<String>,
}

/// Lenient timestamp handling for backend payloads.
///
/// The backend emits ISO-8601 values with or without an offset; values
/// without one are taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|s| {
                super::parse(&s).ok_or_else(|| D::Error::custom(format!("invalid timestamp `{s}`")))
            })
            .transpose()
        }
    }
}
