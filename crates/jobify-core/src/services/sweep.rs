//! Background sweep that deactivates expired postings.
//!
//! Runs periodically so that postings past their expiration date drop out
//! of public listings even if nobody touches them. A posting that expires
//! between sweeps is already hidden by the listing filter; the sweep makes
//! the state durable.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::interval;
use tracing::{error, info, warn};

use jobify_store::Store;

use crate::error::CoreResult;
use crate::metrics::record_expired;

/// Default interval between sweep runs (daily).
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Expired-posting sweeper service.
pub struct ExpirySweeper {
    store: Arc<dyn Store>,
    interval: Duration,
    enabled: bool,
}

impl ExpirySweeper {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let enabled = std::env::var("ENABLE_EXPIRY_SWEEP")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true); // Enabled by default

        let interval_secs = std::env::var("SWEEP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

        Self {
            store,
            interval: Duration::from_secs(interval_secs),
            enabled,
        }
    }

    /// Start the background sweep loop.
    ///
    /// This function runs indefinitely and should be spawned as a background task.
    pub async fn run(&self) {
        if !self.enabled {
            info!("Expiry sweep is disabled");
            return;
        }

        info!("Starting expiry sweeper (interval: {:?})", self.interval);

        let mut ticker = interval(self.interval);

        loop {
            ticker.tick().await;

            match self.sweep_once(Utc::now()).await {
                Ok(0) => {}
                Ok(n) => info!("Expiry sweep complete: {} postings deactivated", n),
                Err(e) => error!("Expiry sweep error: {}", e),
            }
        }
    }

    /// Run a single sweep cycle at `now`. Returns the number of postings
    /// deactivated. Re-running against an already-swept collection is a
    /// no-op: `deactivate` reports false for inactive postings.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> CoreResult<u32> {
        let expired = self.store.jobs().find_expired(now).await?;
        if expired.is_empty() {
            return Ok(0);
        }

        let mut deactivated = 0u32;
        for job in expired {
            match self.store.jobs().deactivate(&job.id).await {
                Ok(true) => {
                    deactivated += 1;
                    info!(
                        job_id = %job.id,
                        expired_at = %job.expiration_date,
                        "Deactivated expired posting"
                    );
                }
                Ok(false) => {} // raced with another sweep or a manual edit
                Err(e) => {
                    // One stuck posting must not stop the rest of the sweep
                    warn!(job_id = %job.id, "Failed to deactivate posting: {}", e);
                }
            }
        }

        record_expired(deactivated);
        Ok(deactivated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    use jobify_models::{Job, JobId, SalaryRange};
    use jobify_store::{JobFilter, JobStore, MemoryStore, Page};

    fn job(id: &str, expires_in_days: i64) -> Job {
        Job {
            id: JobId::from(id),
            company_name: "Acme".to_string(),
            contact_email: "jobs@acme.test".to_string(),
            job_title: format!("Role {}", id),
            job_tags: Default::default(),
            category: "engineering".to_string(),
            job_type: "full-time".to_string(),
            location: "Remote".to_string(),
            salary: SalaryRange::default(),
            expiration_date: Utc::now() + ChronoDuration::days(expires_in_days),
            active: true,
            featured: false,
            applications: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_sweep_deactivates_only_expired_postings() {
        let store = Arc::new(MemoryStore::new());
        JobStore::insert(&*store, &job("expired", -1)).await.unwrap();
        JobStore::insert(&*store, &job("live", 30)).await.unwrap();

        let sweeper = ExpirySweeper::new(Arc::clone(&store) as Arc<dyn Store>);
        let swept = sweeper.sweep_once(Utc::now()).await.unwrap();
        assert_eq!(swept, 1);

        assert!(!store.jobs().get(&JobId::from("expired")).await.unwrap().unwrap().active);
        assert!(store.jobs().get(&JobId::from("live")).await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        JobStore::insert(&*store, &job("expired", -1)).await.unwrap();

        let sweeper = ExpirySweeper::new(Arc::clone(&store) as Arc<dyn Store>);
        assert_eq!(sweeper.sweep_once(Utc::now()).await.unwrap(), 1);
        assert_eq!(sweeper.sweep_once(Utc::now()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_swept_postings_leave_public_listings() {
        let store = Arc::new(MemoryStore::new());
        JobStore::insert(&*store, &job("expired", -1)).await.unwrap();

        let sweeper = ExpirySweeper::new(Arc::clone(&store) as Arc<dyn Store>);
        sweeper.sweep_once(Utc::now()).await.unwrap();

        let listed = store
            .jobs()
            .find(
                &JobFilter { active_only: true, ..Default::default() },
                Page::new(None, None),
            )
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
