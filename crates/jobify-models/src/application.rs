//! Job application models and the application state machine.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::job::JobId;

/// Unique identifier for an application record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    /// Generate a new random application ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ApplicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application status.
///
/// Historically a free-form label, so unknown values round-trip through
/// `Other` instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Rejected,
    Accepted,
    Other(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Other(s) => s,
        }
    }
}

impl From<String> for ApplicationStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "applied" => ApplicationStatus::Applied,
            "interview" => ApplicationStatus::Interview,
            "rejected" => ApplicationStatus::Rejected,
            "accepted" => ApplicationStatus::Accepted,
            _ => ApplicationStatus::Other(s),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(s: ApplicationStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Interview metadata merged into an application when one is scheduled.
///
/// Fields mirror the interview-scheduling allow-list; anything outside it
/// never reaches the stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct InterviewDetails {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    /// On-site location, mutually informative with `link`
    #[serde(default)]
    pub location: Option<String>,
    /// Remote meeting link
    #[serde(default)]
    pub link: Option<String>,
    /// Free-text message from the company
    #[serde(default)]
    pub message: Option<String>,
}

impl InterviewDetails {
    /// True when no interview has been scheduled yet.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.time.is_none()
            && self.location.is_none()
            && self.link.is_none()
            && self.message.is_none()
    }

    /// Merge populated fields of `other` into self, field by field.
    pub fn merge(&mut self, other: &InterviewDetails) {
        if other.date.is_some() {
            self.date = other.date.clone();
        }
        if other.time.is_some() {
            self.time = other.time.clone();
        }
        if other.location.is_some() {
            self.location = other.location.clone();
        }
        if other.link.is_some() {
            self.link = other.link.clone();
        }
        if other.message.is_some() {
            self.message = other.message.clone();
        }
    }
}

/// An application record.
///
/// At most one exists per (job_id, candidate_email) pair; the store
/// enforces the composite uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Application {
    pub id: ApplicationId,

    pub job_id: JobId,

    pub candidate_email: String,

    #[serde(default)]
    pub status: ApplicationStatus,

    #[serde(default)]
    pub interview: InterviewDetails,

    pub applied_at: DateTime<Utc>,
}

impl Application {
    /// Create a fresh application in the initial state.
    pub fn new(job_id: JobId, candidate_email: impl Into<String>) -> Self {
        Self {
            id: ApplicationId::new(),
            job_id,
            candidate_email: candidate_email.into(),
            status: ApplicationStatus::Applied,
            interview: InterviewDetails::default(),
            applied_at: Utc::now(),
        }
    }
}
