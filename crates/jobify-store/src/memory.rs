//! In-memory document store.
//!
//! Reference backend used by tests and local development. It enforces the
//! same constraints a production backend must provide:
//! - unique (job_id, candidate_email) composite keys for applications and
//!   bookmarks, resolved at insert time rather than by check-then-insert
//! - unique primary keys for users (email) and orders (tran_id)
//! - stable listing order: created_at descending, id ascending on ties

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use jobify_models::{
    Application, ApplicationId, ApplicationStatus, Bookmark, CandidateProfile, Company, CompanyId,
    Entitlements, InterviewDetails, Job, JobId, Order, PlanTier, User,
};

use crate::error::{StoreError, StoreResult};
use crate::metrics::{record_conflict, record_operation};
use crate::query::{CompanyFilter, JobFilter, Page};
use crate::store::{
    ApplicationStore, BookmarkStore, CandidateStore, CompanyStore, JobPatch, JobStore, OrderStore,
    Store, UserPatch, UserStore,
};

#[derive(Default)]
struct Collections {
    jobs: HashMap<String, Job>,
    companies: HashMap<String, Company>,
    applications: HashMap<String, Application>,
    /// Composite uniqueness index for applications
    application_keys: HashSet<(String, String)>,
    bookmarks: HashMap<String, Bookmark>,
    /// Composite uniqueness index for bookmarks
    bookmark_keys: HashSet<(String, String)>,
    users: HashMap<String, User>,
    orders: HashMap<String, Order>,
    candidates: HashMap<String, CandidateProfile>,
}

/// In-memory store over independent collections.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Stable listing order shared by all list operations.
fn sort_jobs(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.as_str().cmp(b.id.as_str()))
    });
}

fn sort_companies(companies: &mut [Company]) {
    companies.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.as_str().cmp(b.id.as_str()))
    });
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn insert(&self, job: &Job) -> StoreResult<()> {
        record_operation("insert", "jobs");
        let mut inner = self.inner.write().await;
        if inner.jobs.contains_key(job.id.as_str()) {
            return Err(StoreError::already_exists(format!("jobs/{}", job.id)));
        }
        inner.jobs.insert(job.id.as_str().to_string(), job.clone());
        Ok(())
    }

    async fn get(&self, id: &JobId) -> StoreResult<Option<Job>> {
        record_operation("get", "jobs");
        Ok(self.inner.read().await.jobs.get(id.as_str()).cloned())
    }

    async fn find(&self, filter: &JobFilter, page: Page) -> StoreResult<Vec<Job>> {
        record_operation("find", "jobs");
        let inner = self.inner.read().await;
        let mut matched: Vec<Job> = inner.jobs.values().filter(|j| filter.matches(j)).cloned().collect();
        sort_jobs(&mut matched);
        Ok(page.slice(matched))
    }

    async fn count(&self, filter: &JobFilter) -> StoreResult<u64> {
        record_operation("count", "jobs");
        let inner = self.inner.read().await;
        Ok(inner.jobs.values().filter(|j| filter.matches(j)).count() as u64)
    }

    async fn get_many(&self, ids: &[JobId]) -> StoreResult<Vec<Job>> {
        record_operation("get_many", "jobs");
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.jobs.get(id.as_str()).cloned())
            .collect())
    }

    async fn find_related_by_tags(
        &self,
        tags: &BTreeSet<String>,
        exclude: &JobId,
        limit: usize,
    ) -> StoreResult<Vec<Job>> {
        record_operation("find_related", "jobs");
        let inner = self.inner.read().await;
        let mut related: Vec<Job> = inner
            .jobs
            .values()
            .filter(|j| {
                j.active
                    && &j.id != exclude
                    && j.job_tags.iter().any(|t| tags.contains(t))
            })
            .cloned()
            .collect();
        sort_jobs(&mut related);
        related.truncate(limit);
        Ok(related)
    }

    async fn apply_patch(&self, id: &JobId, patch: &JobPatch) -> StoreResult<bool> {
        record_operation("patch", "jobs");
        let mut inner = self.inner.write().await;
        match inner.jobs.get_mut(id.as_str()) {
            Some(job) => {
                patch.apply_to(job);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_applications(&self, id: &JobId) -> StoreResult<u32> {
        record_operation("increment_applications", "jobs");
        let mut inner = self.inner.write().await;
        let job = inner
            .jobs
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::not_found(format!("jobs/{}", id)))?;
        job.applications += 1;
        Ok(job.applications)
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> StoreResult<Vec<Job>> {
        record_operation("find_expired", "jobs");
        let inner = self.inner.read().await;
        let mut expired: Vec<Job> = inner
            .jobs
            .values()
            .filter(|j| j.active && j.is_expired_at(now))
            .cloned()
            .collect();
        sort_jobs(&mut expired);
        Ok(expired)
    }

    async fn deactivate(&self, id: &JobId) -> StoreResult<bool> {
        record_operation("deactivate", "jobs");
        let mut inner = self.inner.write().await;
        match inner.jobs.get_mut(id.as_str()) {
            Some(job) if job.active => {
                job.active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn insert(&self, company: &Company) -> StoreResult<()> {
        record_operation("insert", "companies");
        let mut inner = self.inner.write().await;
        if inner.companies.contains_key(company.id.as_str()) {
            return Err(StoreError::already_exists(format!("companies/{}", company.id)));
        }
        inner
            .companies
            .insert(company.id.as_str().to_string(), company.clone());
        Ok(())
    }

    async fn get(&self, id: &CompanyId) -> StoreResult<Option<Company>> {
        record_operation("get", "companies");
        Ok(self.inner.read().await.companies.get(id.as_str()).cloned())
    }

    async fn get_by_name(&self, company_name: &str) -> StoreResult<Option<Company>> {
        record_operation("get_by_name", "companies");
        let inner = self.inner.read().await;
        Ok(inner
            .companies
            .values()
            .find(|c| c.company_name == company_name)
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<Company>> {
        record_operation("get_by_email", "companies");
        let inner = self.inner.read().await;
        Ok(inner.companies.values().find(|c| c.email == email).cloned())
    }

    async fn find(&self, filter: &CompanyFilter, page: Page) -> StoreResult<Vec<Company>> {
        record_operation("find", "companies");
        let inner = self.inner.read().await;
        let mut matched: Vec<Company> = inner
            .companies
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        sort_companies(&mut matched);
        Ok(page.slice(matched))
    }

    async fn count(&self, filter: &CompanyFilter) -> StoreResult<u64> {
        record_operation("count", "companies");
        let inner = self.inner.read().await;
        Ok(inner.companies.values().filter(|c| filter.matches(c)).count() as u64)
    }

    async fn set_plan(
        &self,
        email: &str,
        tier: PlanTier,
        entitlements: Entitlements,
    ) -> StoreResult<bool> {
        record_operation("set_plan", "companies");
        let mut inner = self.inner.write().await;
        match inner.companies.values_mut().find(|c| c.email == email) {
            Some(company) => {
                company.plan = tier;
                company.entitlements = entitlements;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn consume_job_slot(&self, email: &str) -> StoreResult<bool> {
        record_operation("consume_job_slot", "companies");
        let mut inner = self.inner.write().await;
        let company = inner
            .companies
            .values_mut()
            .find(|c| c.email == email)
            .ok_or_else(|| StoreError::not_found(format!("companies/email={}", email)))?;
        if company.entitlements.job_limit == 0 {
            return Ok(false);
        }
        company.entitlements.job_limit -= 1;
        Ok(true)
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn insert(&self, application: &Application) -> StoreResult<()> {
        record_operation("insert", "applications");
        let key = (
            application.job_id.as_str().to_string(),
            application.candidate_email.clone(),
        );
        let mut inner = self.inner.write().await;
        if inner.application_keys.contains(&key) {
            record_conflict("applications");
            debug!(
                job_id = %application.job_id,
                candidate = %application.candidate_email,
                "duplicate application insert rejected"
            );
            return Err(StoreError::already_exists(format!(
                "applications/{}:{}",
                key.0, key.1
            )));
        }
        inner.application_keys.insert(key);
        inner
            .applications
            .insert(application.id.as_str().to_string(), application.clone());
        Ok(())
    }

    async fn get(&self, id: &ApplicationId) -> StoreResult<Option<Application>> {
        record_operation("get", "applications");
        Ok(self.inner.read().await.applications.get(id.as_str()).cloned())
    }

    async fn find_by_candidate(&self, candidate_email: &str) -> StoreResult<Vec<Application>> {
        record_operation("find_by_candidate", "applications");
        let inner = self.inner.read().await;
        let mut found: Vec<Application> = inner
            .applications
            .values()
            .filter(|a| a.candidate_email == candidate_email)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.applied_at
                .cmp(&a.applied_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(found)
    }

    async fn update_status(&self, id: &ApplicationId, status: ApplicationStatus) -> StoreResult<bool> {
        record_operation("update_status", "applications");
        let mut inner = self.inner.write().await;
        match inner.applications.get_mut(id.as_str()) {
            Some(app) => {
                app.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn merge_interview(
        &self,
        id: &ApplicationId,
        details: &InterviewDetails,
        status: Option<ApplicationStatus>,
    ) -> StoreResult<bool> {
        record_operation("merge_interview", "applications");
        let mut inner = self.inner.write().await;
        match inner.applications.get_mut(id.as_str()) {
            Some(app) => {
                app.interview.merge(details);
                if let Some(s) = status {
                    app.status = s;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn insert(&self, bookmark: &Bookmark) -> StoreResult<()> {
        record_operation("insert", "bookmarks");
        let key = (
            bookmark.job_id.as_str().to_string(),
            bookmark.candidate_email.clone(),
        );
        let mut inner = self.inner.write().await;
        if inner.bookmark_keys.contains(&key) {
            record_conflict("bookmarks");
            return Err(StoreError::already_exists(format!(
                "bookmarks/{}:{}",
                key.0, key.1
            )));
        }
        inner.bookmark_keys.insert(key);
        inner.bookmarks.insert(bookmark.id.clone(), bookmark.clone());
        Ok(())
    }

    async fn find_by_candidate(&self, candidate_email: &str) -> StoreResult<Vec<Bookmark>> {
        record_operation("find_by_candidate", "bookmarks");
        let inner = self.inner.read().await;
        let mut found: Vec<Bookmark> = inner
            .bookmarks
            .values()
            .filter(|b| b.candidate_email == candidate_email)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        record_operation("insert", "users");
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.email) {
            record_conflict("users");
            return Err(StoreError::already_exists(format!("users/{}", user.email)));
        }
        inner.users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn get(&self, email: &str) -> StoreResult<Option<User>> {
        record_operation("get", "users");
        Ok(self.inner.read().await.users.get(email).cloned())
    }

    async fn apply_patch(&self, email: &str, patch: &UserPatch) -> StoreResult<bool> {
        record_operation("patch", "users");
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(email) {
            Some(user) => {
                patch.apply_to(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, email: &str) -> StoreResult<bool> {
        record_operation("delete", "users");
        Ok(self.inner.write().await.users.remove(email).is_some())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert(&self, order: &Order) -> StoreResult<()> {
        record_operation("insert", "orders");
        let mut inner = self.inner.write().await;
        if inner.orders.contains_key(&order.tran_id) {
            record_conflict("orders");
            return Err(StoreError::already_exists(format!("orders/{}", order.tran_id)));
        }
        inner.orders.insert(order.tran_id.clone(), order.clone());
        Ok(())
    }

    async fn get(&self, tran_id: &str) -> StoreResult<Option<Order>> {
        record_operation("get", "orders");
        Ok(self.inner.read().await.orders.get(tran_id).cloned())
    }

    async fn mark_completed(&self, tran_id: &str) -> StoreResult<Option<Order>> {
        record_operation("mark_completed", "orders");
        let mut inner = self.inner.write().await;
        match inner.orders.get_mut(tran_id) {
            Some(order) => {
                order.paid = true;
                order.active = true;
                Ok(Some(order.clone()))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn upsert(&self, profile: &CandidateProfile) -> StoreResult<()> {
        record_operation("upsert", "candidates");
        let mut inner = self.inner.write().await;
        inner
            .candidates
            .insert(profile.candidate_email.clone(), profile.clone());
        Ok(())
    }

    async fn get(&self, candidate_email: &str) -> StoreResult<Option<CandidateProfile>> {
        record_operation("get", "candidates");
        Ok(self.inner.read().await.candidates.get(candidate_email).cloned())
    }
}

impl Store for MemoryStore {
    fn jobs(&self) -> &dyn JobStore {
        self
    }
    fn companies(&self) -> &dyn CompanyStore {
        self
    }
    fn applications(&self) -> &dyn ApplicationStore {
        self
    }
    fn bookmarks(&self) -> &dyn BookmarkStore {
        self
    }
    fn users(&self) -> &dyn UserStore {
        self
    }
    fn orders(&self) -> &dyn OrderStore {
        self
    }
    fn candidates(&self) -> &dyn CandidateStore {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jobify_models::SalaryRange;

    fn job(id: &str, minutes_ago: i64) -> Job {
        Job {
            id: JobId::from(id),
            company_name: "Acme".to_string(),
            contact_email: "jobs@acme.test".to_string(),
            job_title: format!("Job {}", id),
            job_tags: ["rust"].iter().map(|s| s.to_string()).collect(),
            category: "engineering".to_string(),
            job_type: "full-time".to_string(),
            location: "Remote".to_string(),
            salary: SalaryRange::default(),
            expiration_date: Utc::now() + Duration::days(30),
            active: true,
            featured: false,
            applications: 0,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_duplicate_application_insert_conflicts() {
        let store = MemoryStore::new();
        let first = Application::new(JobId::from("j1"), "a@x.com");
        let second = Application::new(JobId::from("j1"), "a@x.com");

        ApplicationStore::insert(&store, &first).await.unwrap();
        let err = ApplicationStore::insert(&store, &second).await.unwrap_err();
        assert!(err.is_already_exists());

        // Exactly one record persisted
        let found = store.applications().find_by_candidate("a@x.com").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, first.id);

        // A different pair is fine
        let other = Application::new(JobId::from("j2"), "a@x.com");
        ApplicationStore::insert(&store, &other).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_bookmark_insert_conflicts() {
        let store = MemoryStore::new();
        let first = Bookmark::new(JobId::from("j1"), "a@x.com");
        BookmarkStore::insert(&store, &first).await.unwrap();

        let dup = Bookmark::new(JobId::from("j1"), "a@x.com");
        assert!(BookmarkStore::insert(&store, &dup).await.unwrap_err().is_already_exists());
    }

    #[tokio::test]
    async fn test_find_pagination_is_stable() {
        let store = MemoryStore::new();
        for i in 0..25 {
            JobStore::insert(&store, &job(&format!("j{:02}", i), i)).await.unwrap();
        }

        // Newest first: j00 was created most recently
        let page1 = store
            .jobs()
            .find(&JobFilter::default(), Page::new(Some(1), Some(10)))
            .await
            .unwrap();
        let page2 = store
            .jobs()
            .find(&JobFilter::default(), Page::new(Some(2), Some(10)))
            .await
            .unwrap();

        let ids1: Vec<&str> = page1.iter().map(|j| j.id.as_str()).collect();
        let ids2: Vec<&str> = page2.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids1[0], "j00");
        assert_eq!(ids2[0], "j10");
        assert_eq!(ids2.len(), 10);

        // Beyond the last page: empty
        let page4 = store
            .jobs()
            .find(&JobFilter::default(), Page::new(Some(4), Some(10)))
            .await
            .unwrap();
        assert!(page4.is_empty());
    }

    #[tokio::test]
    async fn test_count_is_of_filtered_query() {
        let store = MemoryStore::new();
        for i in 0..5 {
            let mut j = job(&format!("f{}", i), i);
            j.featured = i % 2 == 0;
            JobStore::insert(&store, &j).await.unwrap();
        }

        let filter = JobFilter { featured: Some(true), ..Default::default() };
        assert_eq!(store.jobs().count(&filter).await.unwrap(), 3);
        assert_eq!(store.jobs().count(&JobFilter::default()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_related_by_tags_excludes_self() {
        let store = MemoryStore::new();
        let mut a = job("a", 0);
        a.job_tags = ["rust", "api"].iter().map(|s| s.to_string()).collect();
        let mut b = job("b", 1);
        b.job_tags = ["api"].iter().map(|s| s.to_string()).collect();
        let mut c = job("c", 2);
        c.job_tags = ["design"].iter().map(|s| s.to_string()).collect();
        for j in [&a, &b, &c] {
            JobStore::insert(&store, j).await.unwrap();
        }

        let related = store
            .jobs()
            .find_related_by_tags(&a.job_tags, &a.id, 10)
            .await
            .unwrap();
        let ids: Vec<&str> = related.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[tokio::test]
    async fn test_deactivate_is_idempotent() {
        let store = MemoryStore::new();
        let mut j = job("exp", 0);
        j.expiration_date = Utc::now() - Duration::days(1);
        JobStore::insert(&store, &j).await.unwrap();

        let expired = store.jobs().find_expired(Utc::now()).await.unwrap();
        assert_eq!(expired.len(), 1);

        assert!(store.jobs().deactivate(&j.id).await.unwrap());
        // Second flip is a no-op
        assert!(!store.jobs().deactivate(&j.id).await.unwrap());
        assert!(store.jobs().find_expired(Utc::now()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_consume_job_slot_exhaustion() {
        let store = MemoryStore::new();
        let company = Company {
            id: CompanyId::from("c1"),
            company_name: "Acme".to_string(),
            email: "billing@acme.test".to_string(),
            logo: None,
            website: None,
            description: None,
            location: None,
            plan: PlanTier::Basic,
            entitlements: Entitlements {
                job_limit: 1,
                resume_access_limit: 10,
                resume_visibility_limit: 10,
            },
            featured: false,
            created_at: Utc::now(),
        };
        CompanyStore::insert(&store, &company).await.unwrap();

        assert!(store.companies().consume_job_slot("billing@acme.test").await.unwrap());
        assert!(!store.companies().consume_job_slot("billing@acme.test").await.unwrap());
        assert!(store
            .companies()
            .consume_job_slot("nobody@nowhere.test")
            .await
            .unwrap_err()
            .to_string()
            .contains("not found"));
    }

    #[tokio::test]
    async fn test_order_completion() {
        let store = MemoryStore::new();
        let order = Order::pending("T1", "billing@acme.test", PlanTier::Standard, 49.0, "USD");
        OrderStore::insert(&store, &order).await.unwrap();

        // Duplicate transaction ids are rejected
        assert!(OrderStore::insert(&store, &order).await.unwrap_err().is_already_exists());

        let completed = store.orders().mark_completed("T1").await.unwrap().unwrap();
        assert!(completed.paid && completed.active);
        assert!(store.orders().mark_completed("T2").await.unwrap().is_none());
    }
}
