//! Bookmark models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::job::JobId;

/// A bookmarked job.
///
/// At most one exists per (job_id, candidate_email) pair; there are no
/// state transitions beyond exists/absent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Bookmark {
    pub id: String,
    pub job_id: JobId,
    pub candidate_email: String,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(job_id: JobId, candidate_email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_id,
            candidate_email: candidate_email.into(),
            created_at: Utc::now(),
        }
    }
}
