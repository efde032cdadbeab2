use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to every persisted submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl SubmissionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted record: identifier and creation timestamp are assigned by the
/// store at insert time and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: SubmissionId,
    pub created_at: DateTime<Utc>,
    pub fields: T,
}

impl<T> Stored<T> {
    /// Stamp freshly validated fields with an identifier and timestamp.
    /// Store implementations call this exactly once per insert.
    pub fn assign(fields: T) -> Self {
        Self {
            id: SubmissionId::generate(),
            created_at: Utc::now(),
            fields,
        }
    }
}

/// A consultation booking, validated and normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub service: String,
    pub service_label: String,
    pub date: NaiveDate,
    pub time: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub website: Option<String>,
}

/// A contact-form message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub service: Option<String>,
}

/// A career application. `resume_path` is the opaque handle returned by the
/// resume storage backend; the core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerApplication {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub experience: Option<String>,
    pub message: Option<String>,
    pub resume_path: String,
}

/// A newsletter signup. The email is unique across all subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSubscription {
    pub email: String,
}
