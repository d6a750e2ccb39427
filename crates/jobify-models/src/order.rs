//! Plan purchase orders.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::plan::PlanTier;

/// A plan purchase, keyed by the gateway transaction id.
///
/// Created when a purchase is initiated; flipped to paid/active exactly
/// once when the completion callback (or the direct confirmation) lands.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Order {
    /// Gateway transaction id (unique)
    pub tran_id: String,

    /// Purchasing company account
    pub user_email: String,

    pub plan: PlanTier,

    pub amount: f64,

    pub currency: String,

    /// Payment completed
    #[serde(default)]
    pub paid: bool,

    /// Entitlements applied
    #[serde(default)]
    pub active: bool,

    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a pending order for an initiated purchase.
    pub fn pending(
        tran_id: impl Into<String>,
        user_email: impl Into<String>,
        plan: PlanTier,
        amount: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            tran_id: tran_id.into(),
            user_email: user_email.into(),
            plan,
            amount,
            currency: currency.into(),
            paid: false,
            active: false,
            created_at: Utc::now(),
        }
    }
}
