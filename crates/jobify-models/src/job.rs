//! Job posting models.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
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

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Salary range in the posting's currency.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
}

/// A job posting stored in the jobs collection.
///
/// Companies are referenced by `company_name` equality rather than by id;
/// the join is resolved at query time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Owning company, matched by name
    pub company_name: String,

    /// Contact address of the posting company (internal only)
    pub contact_email: String,

    pub job_title: String,

    /// Tag set used for related-job matching
    #[serde(default)]
    pub job_tags: BTreeSet<String>,

    pub category: String,

    /// Employment type (full-time, part-time, remote, ...)
    pub job_type: String,

    pub location: String,

    #[serde(default)]
    pub salary: SalaryRange,

    /// After this instant the nightly sweep flips the posting inactive
    pub expiration_date: DateTime<Utc>,

    /// Active/expired flag
    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub featured: bool,

    /// Number of applications received
    #[serde(default)]
    pub applications: u32,

    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Job {
    /// True if this job shares at least one tag with `other`.
    pub fn shares_tag_with(&self, other: &Job) -> bool {
        self.job_tags.iter().any(|t| other.job_tags.contains(t))
    }

    /// True if the posting is past its expiration date.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date < now
    }

    /// Public view with internal-only fields stripped.
    pub fn to_public(&self) -> JobPublic {
        JobPublic {
            id: self.id.clone(),
            company_name: self.company_name.clone(),
            job_title: self.job_title.clone(),
            category: self.category.clone(),
            job_type: self.job_type.clone(),
            location: self.location.clone(),
            salary: self.salary,
            expiration_date: self.expiration_date,
            active: self.active,
            featured: self.featured,
            applications: self.applications,
            created_at: self.created_at,
        }
    }
}

/// Presentation view of a job: the tag list and raw contact email are
/// internal and never leave the service.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobPublic {
    pub id: JobId,
    pub company_name: String,
    pub job_title: String,
    pub category: String,
    pub job_type: String,
    pub location: String,
    pub salary: SalaryRange,
    pub expiration_date: DateTime<Utc>,
    pub active: bool,
    pub featured: bool,
    pub applications: u32,
    pub created_at: DateTime<Utc>,
}
