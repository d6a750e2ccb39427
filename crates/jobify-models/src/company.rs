//! Company models.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::plan::{Entitlements, PlanTier};

/// Unique identifier for a company record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CompanyId(pub String);

impl CompanyId {
    /// Generate a new random company ID.
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

impl Default for CompanyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A company record.
///
/// Plan and entitlement fields are mutated when a purchase completes and
/// when a job posting consumes one unit of `job_limit`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Company {
    pub id: CompanyId,

    /// Display name; jobs reference companies by this value
    pub company_name: String,

    /// Billing/contact address, also the key used by entitlement updates
    pub email: String,

    #[serde(default)]
    pub logo: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    /// Current plan tier
    #[serde(default)]
    pub plan: PlanTier,

    /// Remaining entitlements under the current plan
    #[serde(default)]
    pub entitlements: Entitlements,

    #[serde(default)]
    pub featured: bool,

    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Public view with plan and limit fields stripped.
    pub fn to_public(&self) -> CompanyPublic {
        CompanyPublic {
            id: self.id.clone(),
            company_name: self.company_name.clone(),
            logo: self.logo.clone(),
            website: self.website.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            featured: self.featured,
        }
    }
}

/// Presentation view of a company: plan tier, entitlement counters, and the
/// billing address are internal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompanyPublic {
    pub id: CompanyId,
    pub company_name: String,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub featured: bool,
}
