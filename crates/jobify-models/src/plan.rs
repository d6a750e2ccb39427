//! Plan tiers and the entitlement table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Plan tier enumeration.
///
/// `None` is the state of a company that has never purchased a plan; it is
/// not a purchasable tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    None,
    Basic,
    Standard,
    Premium,
}

/// Error returned when a tier name is not recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown plan tier: {0}")]
pub struct PlanTierParseError(pub String);

impl FromStr for PlanTier {
    type Err = PlanTierParseError;

    /// Parse a purchasable tier name (case-insensitive).
    ///
    /// Unknown names are an error rather than a silent fallthrough; both
    /// payment-completion paths rely on this failing loudly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(PlanTier::Basic),
            "standard" => Ok(PlanTier::Standard),
            "premium" => Ok(PlanTier::Premium),
            other => Err(PlanTierParseError(other.to_string())),
        }
    }
}

impl PlanTier {
    /// Get the tier name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::None => "none",
            PlanTier::Basic => "basic",
            PlanTier::Standard => "standard",
            PlanTier::Premium => "premium",
        }
    }

    /// True for tiers that can be bought.
    pub fn is_purchasable(&self) -> bool {
        !matches!(self, PlanTier::None)
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Numeric limits granted by a purchased plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Entitlements {
    /// Remaining job postings
    pub job_limit: u32,
    /// Resume profiles the company may open
    pub resume_access_limit: u32,
    /// Resume profiles visible in search
    pub resume_visibility_limit: u32,
}

impl Entitlements {
    /// The fixed entitlement table. Pure: the same tier always yields the
    /// same limits regardless of prior values.
    pub fn for_tier(tier: PlanTier) -> Self {
        match tier {
            PlanTier::None => Self::default(),
            PlanTier::Basic => Self {
                job_limit: 5,
                resume_access_limit: 10,
                resume_visibility_limit: 10,
            },
            PlanTier::Standard => Self {
                job_limit: 10,
                resume_access_limit: 20,
                resume_visibility_limit: 20,
            },
            PlanTier::Premium => Self {
                job_limit: 20,
                resume_access_limit: 50,
                resume_visibility_limit: 50,
            },
        }
    }
}
