//! Plan purchases and the shared entitlement updater.
//!
//! Two completion paths exist (the gateway callback and the client-side
//! confirmation), and both funnel into the same `apply_plan` procedure so
//! the entitlement table is written from exactly one place.

use std::sync::Arc;

use tracing::{info, warn};

use jobify_models::{Entitlements, Order, PlanTier, Role};
use jobify_store::Store;

use crate::error::{CoreError, CoreResult};
use crate::identity::{require_role, Identity};
use crate::payments::{PaymentInitiator, PaymentRequest, PaymentSession};

/// Checkout prices per purchasable tier, in USD.
fn price_for(tier: PlanTier) -> Option<f64> {
    match tier {
        PlanTier::None => None,
        PlanTier::Basic => Some(29.0),
        PlanTier::Standard => Some(49.0),
        PlanTier::Premium => Some(99.0),
    }
}

/// Redirect targets handed to the gateway when a checkout is created.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub fail_url: String,
    pub cancel_url: String,
}

/// Outcome of a purchase initiation.
#[derive(Debug)]
pub enum PurchaseOutcome {
    Initiated(PaymentSession),
    /// Refused role check (only company accounts buy plans)
    PolicyViolation,
}

/// Outcome of a completion attempt, from either path.
#[derive(Debug)]
pub enum CompletionOutcome {
    Completed {
        tier: PlanTier,
        /// False when the order's company no longer exists
        company_updated: bool,
    },
    /// The transaction id matches no order
    UnknownTransaction,
}

/// Initiates plan purchases and applies entitlements on completion.
#[derive(Clone)]
pub struct EntitlementService {
    store: Arc<dyn Store>,
    gateway: Arc<dyn PaymentInitiator>,
}

impl EntitlementService {
    pub fn new(store: Arc<dyn Store>, gateway: Arc<dyn PaymentInitiator>) -> Self {
        Self { store, gateway }
    }

    /// Start a plan purchase: checkout session at the gateway plus a
    /// pending order keyed by the gateway's transaction id.
    pub async fn purchase(
        &self,
        identity: &Identity,
        tier: PlanTier,
        urls: CheckoutUrls,
    ) -> CoreResult<PurchaseOutcome> {
        if require_role(identity, Role::Company, "purchase_plan").is_err() {
            return Ok(PurchaseOutcome::PolicyViolation);
        }

        let amount = price_for(tier)
            .ok_or_else(|| CoreError::validation(format!("tier {} is not purchasable", tier)))?;

        if self
            .store
            .companies()
            .get_by_email(&identity.email)
            .await?
            .is_none()
        {
            return Err(CoreError::not_found(format!("company {}", identity.email)));
        }

        let session = self
            .gateway
            .initiate(PaymentRequest {
                amount,
                currency: "USD".to_string(),
                tier,
                success_url: urls.success_url,
                fail_url: urls.fail_url,
                cancel_url: urls.cancel_url,
            })
            .await
            .map_err(|e| CoreError::Collaborator(e.to_string()))?;

        let order = Order::pending(&session.tran_id, &identity.email, tier, amount, "USD");
        self.store.orders().insert(&order).await?;

        info!(tran_id = %session.tran_id, tier = %tier, company = %identity.email, "purchase initiated");
        Ok(PurchaseOutcome::Initiated(session))
    }

    /// Gateway-callback completion path.
    pub async fn complete(&self, tran_id: &str) -> CoreResult<CompletionOutcome> {
        let Some(order) = self.store.orders().mark_completed(tran_id).await? else {
            warn!(tran_id, "completion for unknown transaction");
            return Ok(CompletionOutcome::UnknownTransaction);
        };
        self.apply_plan(order).await
    }

    /// Client-side confirmation path. Same procedure, with the extra check
    /// that the confirming account owns the order.
    pub async fn confirm(&self, identity: &Identity, tran_id: &str) -> CoreResult<CompletionOutcome> {
        let Some(order) = self.store.orders().get(tran_id).await? else {
            return Ok(CompletionOutcome::UnknownTransaction);
        };
        if order.user_email != identity.email {
            warn!(tran_id, actor = %identity.email, "confirmation by non-owner");
            return Ok(CompletionOutcome::UnknownTransaction);
        }
        let Some(order) = self.store.orders().mark_completed(tran_id).await? else {
            return Ok(CompletionOutcome::UnknownTransaction);
        };
        self.apply_plan(order).await
    }

    /// The single write point for plan state: look the limits up in the
    /// entitlement table and stamp them onto the company record. Prior
    /// values never leak through; the table is authoritative.
    async fn apply_plan(&self, order: Order) -> CoreResult<CompletionOutcome> {
        let entitlements = Entitlements::for_tier(order.plan);
        let company_updated = self
            .store
            .companies()
            .set_plan(&order.user_email, order.plan, entitlements)
            .await?;
        if !company_updated {
            warn!(tran_id = %order.tran_id, company = %order.user_email, "paid order for missing company");
        } else {
            info!(tran_id = %order.tran_id, tier = %order.plan, company = %order.user_email, "entitlements applied");
        }
        Ok(CompletionOutcome::Completed {
            tier: order.plan,
            company_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use jobify_models::{Company, CompanyId};
    use jobify_store::{CompanyStore, MemoryStore};

    use crate::payments::DevGateway;

    fn company(email: &str) -> Company {
        Company {
            id: CompanyId::from("c1"),
            company_name: "Acme".to_string(),
            email: email.to_string(),
            logo: None,
            website: None,
            description: None,
            location: None,
            plan: PlanTier::None,
            entitlements: Entitlements::default(),
            featured: false,
            created_at: Utc::now(),
        }
    }

    fn urls() -> CheckoutUrls {
        CheckoutUrls {
            success_url: "https://app.test/ok".to_string(),
            fail_url: "https://app.test/fail".to_string(),
            cancel_url: "https://app.test/cancel".to_string(),
        }
    }

    fn service() -> (EntitlementService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = EntitlementService::new(
            Arc::clone(&store) as Arc<dyn Store>,
            Arc::new(DevGateway::new("https://pay.test")),
        );
        (service, store)
    }

    #[tokio::test]
    async fn test_purchase_then_complete_applies_table_values() {
        let (service, store) = service();
        CompanyStore::insert(&*store, &company("billing@acme.test")).await.unwrap();
        let identity = Identity::company("billing@acme.test");

        let outcome = service
            .purchase(&identity, PlanTier::Standard, urls())
            .await
            .unwrap();
        let session = match outcome {
            PurchaseOutcome::Initiated(session) => session,
            other => panic!("expected Initiated, got {:?}", other),
        };

        // Pending until completion
        let stored = store.companies().get_by_email("billing@acme.test").await.unwrap().unwrap();
        assert_eq!(stored.plan, PlanTier::None);

        let completion = service.complete(&session.tran_id).await.unwrap();
        assert!(matches!(
            completion,
            CompletionOutcome::Completed { tier: PlanTier::Standard, company_updated: true }
        ));

        let stored = store.companies().get_by_email("billing@acme.test").await.unwrap().unwrap();
        assert_eq!(stored.plan, PlanTier::Standard);
        assert_eq!(stored.entitlements, Entitlements::for_tier(PlanTier::Standard));
    }

    #[tokio::test]
    async fn test_upgrade_overwrites_rather_than_accumulates() {
        let (service, store) = service();
        CompanyStore::insert(&*store, &company("billing@acme.test")).await.unwrap();
        let identity = Identity::company("billing@acme.test");

        for tier in [PlanTier::Premium, PlanTier::Basic] {
            let outcome = service.purchase(&identity, tier, urls()).await.unwrap();
            let session = match outcome {
                PurchaseOutcome::Initiated(session) => session,
                other => panic!("expected Initiated, got {:?}", other),
            };
            service.complete(&session.tran_id).await.unwrap();
        }

        // Downgrade after premium lands exactly on the basic row
        let stored = store.companies().get_by_email("billing@acme.test").await.unwrap().unwrap();
        assert_eq!(stored.plan, PlanTier::Basic);
        assert_eq!(stored.entitlements, Entitlements::for_tier(PlanTier::Basic));
    }

    #[tokio::test]
    async fn test_candidate_purchase_is_policy_violation() {
        let (service, _store) = service();
        let outcome = service
            .purchase(&Identity::candidate("a@x.com"), PlanTier::Basic, urls())
            .await
            .unwrap();
        assert!(matches!(outcome, PurchaseOutcome::PolicyViolation));
    }

    #[tokio::test]
    async fn test_unpurchasable_tier_is_validation_error() {
        let (service, store) = service();
        CompanyStore::insert(&*store, &company("billing@acme.test")).await.unwrap();
        let err = service
            .purchase(&Identity::company("billing@acme.test"), PlanTier::None, urls())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_transaction_changes_nothing() {
        let (service, store) = service();
        CompanyStore::insert(&*store, &company("billing@acme.test")).await.unwrap();

        let completion = service.complete("no-such-tran").await.unwrap();
        assert!(matches!(completion, CompletionOutcome::UnknownTransaction));

        let stored = store.companies().get_by_email("billing@acme.test").await.unwrap().unwrap();
        assert_eq!(stored.plan, PlanTier::None);
    }

    #[tokio::test]
    async fn test_confirmation_by_non_owner_is_rejected() {
        let (service, store) = service();
        CompanyStore::insert(&*store, &company("billing@acme.test")).await.unwrap();
        let outcome = service
            .purchase(&Identity::company("billing@acme.test"), PlanTier::Basic, urls())
            .await
            .unwrap();
        let session = match outcome {
            PurchaseOutcome::Initiated(session) => session,
            other => panic!("expected Initiated, got {:?}", other),
        };

        let completion = service
            .confirm(&Identity::company("intruder@evil.test"), &session.tran_id)
            .await
            .unwrap();
        assert!(matches!(completion, CompletionOutcome::UnknownTransaction));

        let stored = store.companies().get_by_email("billing@acme.test").await.unwrap().unwrap();
        assert_eq!(stored.plan, PlanTier::None);
    }
}
