//! Payment initiator seam.
//!
//! Gateways are opaque collaborators: the workflow asks for a checkout
//! session up front and learns the result later through the completion
//! callback handled by the entitlement service.

use async_trait::async_trait;
use uuid::Uuid;

use jobify_models::PlanTier;

/// Parameters of a checkout session request.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub amount: f64,
    pub currency: String,
    pub tier: PlanTier,
    pub success_url: String,
    pub fail_url: String,
    pub cancel_url: String,
}

/// A created checkout session.
#[derive(Debug, Clone)]
pub struct PaymentSession {
    /// Where to send the purchaser
    pub redirect_url: String,
    /// Gateway transaction id, later reported by the completion callback
    pub tran_id: String,
}

/// Opaque payment-initiation collaborator.
#[async_trait]
pub trait PaymentInitiator: Send + Sync {
    async fn initiate(&self, request: PaymentRequest) -> anyhow::Result<PaymentSession>;
}

/// Local stand-in gateway: mints a transaction id and a checkout URL under
/// a configurable base. Completion still goes through the normal callback.
pub struct DevGateway {
    base_url: String,
}

impl DevGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PaymentInitiator for DevGateway {
    async fn initiate(&self, request: PaymentRequest) -> anyhow::Result<PaymentSession> {
        let tran_id = Uuid::new_v4().to_string();
        Ok(PaymentSession {
            redirect_url: format!(
                "{}/checkout/{}?tier={}&amount={}&currency={}",
                self.base_url, tran_id, request.tier, request.amount, request.currency
            ),
            tran_id,
        })
    }
}
