//! Extended candidate profiles.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Resume-level profile data, distinct from the `User` account record and
/// keyed by candidate email.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CandidateProfile {
    /// Unique key
    pub candidate_email: String,

    #[serde(default)]
    pub resume_url: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub experience_summary: Option<String>,

    #[serde(default)]
    pub expected_salary: Option<u32>,

    pub updated_at: DateTime<Utc>,
}
