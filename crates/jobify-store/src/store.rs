//! Per-collection repository traits.
//!
//! The workflow layer is written against these traits only; swapping the
//! backing engine means implementing them against another driver.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobify_models::{
    Application, ApplicationId, ApplicationStatus, Bookmark, CandidateProfile, Company, CompanyId,
    Entitlements, InterviewDetails, Job, JobId, Order, PlanTier, User,
};

use crate::error::StoreResult;
use crate::query::{CompanyFilter, JobFilter, Page};

// ============================================================================
// Patches (explicit allow-lists)
// ============================================================================

/// Patchable job fields. Anything outside this allow-list never reaches a
/// stored record, whatever the request body carried.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_min: Option<u32>,
    #[serde(default)]
    pub salary_max: Option<u32>,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl JobPatch {
    /// True when no field is set; callers skip the write entirely.
    pub fn is_empty(&self) -> bool {
        self.job_title.is_none()
            && self.category.is_none()
            && self.job_type.is_none()
            && self.location.is_none()
            && self.salary_min.is_none()
            && self.salary_max.is_none()
            && self.expiration_date.is_none()
            && self.featured.is_none()
            && self.active.is_none()
    }

    /// Apply the patch to a job record in place.
    pub fn apply_to(&self, job: &mut Job) {
        if let Some(ref v) = self.job_title {
            job.job_title = v.clone();
        }
        if let Some(ref v) = self.category {
            job.category = v.clone();
        }
        if let Some(ref v) = self.job_type {
            job.job_type = v.clone();
        }
        if let Some(ref v) = self.location {
            job.location = v.clone();
        }
        if let Some(v) = self.salary_min {
            job.salary.min = v;
        }
        if let Some(v) = self.salary_max {
            job.salary.max = v;
        }
        if let Some(v) = self.expiration_date {
            job.expiration_date = v;
        }
        if let Some(v) = self.featured {
            job.featured = v;
        }
        if let Some(v) = self.active {
            job.active = v;
        }
    }
}

/// Patchable user profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.photo.is_none() && self.phone.is_none() && self.location.is_none()
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(ref v) = self.name {
            user.name = v.clone();
        }
        if let Some(ref v) = self.photo {
            user.photo = Some(v.clone());
        }
        if let Some(ref v) = self.phone {
            user.phone = Some(v.clone());
        }
        if let Some(ref v) = self.location {
            user.location = Some(v.clone());
        }
    }
}

// ============================================================================
// Collection traits
// ============================================================================

/// Jobs collection.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: &Job) -> StoreResult<()>;

    async fn get(&self, id: &JobId) -> StoreResult<Option<Job>>;

    /// Filtered, stably-ordered page of jobs.
    async fn find(&self, filter: &JobFilter, page: Page) -> StoreResult<Vec<Job>>;

    /// Count of the filtered query (not the whole collection).
    async fn count(&self, filter: &JobFilter) -> StoreResult<u64>;

    /// Fetch several jobs by id; missing ids are omitted.
    async fn get_many(&self, ids: &[JobId]) -> StoreResult<Vec<Job>>;

    /// Active jobs sharing at least one tag with `tags`, excluding
    /// `exclude` by id.
    async fn find_related_by_tags(
        &self,
        tags: &BTreeSet<String>,
        exclude: &JobId,
        limit: usize,
    ) -> StoreResult<Vec<Job>>;

    /// Apply an allow-listed patch. Returns false when the job is missing.
    async fn apply_patch(&self, id: &JobId, patch: &JobPatch) -> StoreResult<bool>;

    /// Increment the applications counter; returns the new value.
    async fn increment_applications(&self, id: &JobId) -> StoreResult<u32>;

    /// Active jobs past their expiration date at `now`.
    async fn find_expired(&self, now: DateTime<Utc>) -> StoreResult<Vec<Job>>;

    /// Flip a posting inactive. Returns false when already inactive or
    /// missing, which keeps the sweep idempotent.
    async fn deactivate(&self, id: &JobId) -> StoreResult<bool>;
}

/// Companies collection.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn insert(&self, company: &Company) -> StoreResult<()>;

    async fn get(&self, id: &CompanyId) -> StoreResult<Option<Company>>;

    /// Denormalized join key used by the enrichment resolver.
    async fn get_by_name(&self, company_name: &str) -> StoreResult<Option<Company>>;

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<Company>>;

    async fn find(&self, filter: &CompanyFilter, page: Page) -> StoreResult<Vec<Company>>;

    async fn count(&self, filter: &CompanyFilter) -> StoreResult<u64>;

    /// Set the plan tier and reset entitlements to the table values. The
    /// single write point shared by both payment-completion paths.
    async fn set_plan(
        &self,
        email: &str,
        tier: PlanTier,
        entitlements: Entitlements,
    ) -> StoreResult<bool>;

    /// Consume one job posting slot. Ok(false) when the limit is
    /// exhausted; NotFound when no company matches the email.
    async fn consume_job_slot(&self, email: &str) -> StoreResult<bool>;
}

/// Applications collection. Inserts are constrained on the
/// (job_id, candidate_email) composite key.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Insert a new application. `AlreadyExists` signals the duplicate
    /// outcome; there is no separate pre-check.
    async fn insert(&self, application: &Application) -> StoreResult<()>;

    async fn get(&self, id: &ApplicationId) -> StoreResult<Option<Application>>;

    async fn find_by_candidate(&self, candidate_email: &str) -> StoreResult<Vec<Application>>;

    /// Update the stored status. Returns false when the record is missing.
    async fn update_status(&self, id: &ApplicationId, status: ApplicationStatus) -> StoreResult<bool>;

    /// Merge interview details (and optionally a status) into the record.
    /// Returns false when the record is missing.
    async fn merge_interview(
        &self,
        id: &ApplicationId,
        details: &InterviewDetails,
        status: Option<ApplicationStatus>,
    ) -> StoreResult<bool>;
}

/// Bookmarks collection, with the same composite constraint.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn insert(&self, bookmark: &Bookmark) -> StoreResult<()>;

    async fn find_by_candidate(&self, candidate_email: &str) -> StoreResult<Vec<Bookmark>>;
}

/// Users collection, keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn get(&self, email: &str) -> StoreResult<Option<User>>;

    async fn apply_patch(&self, email: &str, patch: &UserPatch) -> StoreResult<bool>;

    async fn delete(&self, email: &str) -> StoreResult<bool>;
}

/// Orders collection, keyed by transaction id.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: &Order) -> StoreResult<()>;

    async fn get(&self, tran_id: &str) -> StoreResult<Option<Order>>;

    /// Mark an order paid and active. Returns the updated order, or None
    /// when the transaction id is unknown.
    async fn mark_completed(&self, tran_id: &str) -> StoreResult<Option<Order>>;
}

/// Extended candidate profiles, keyed by candidate email.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn upsert(&self, profile: &CandidateProfile) -> StoreResult<()>;

    async fn get(&self, candidate_email: &str) -> StoreResult<Option<CandidateProfile>>;
}

/// The injected storage interface: explicit per-collection accessors, no
/// ambient connection state.
pub trait Store: Send + Sync {
    fn jobs(&self) -> &dyn JobStore;
    fn companies(&self) -> &dyn CompanyStore;
    fn applications(&self) -> &dyn ApplicationStore;
    fn bookmarks(&self) -> &dyn BookmarkStore;
    fn users(&self) -> &dyn UserStore;
    fn orders(&self) -> &dyn OrderStore;
    fn candidates(&self) -> &dyn CandidateStore;
}
