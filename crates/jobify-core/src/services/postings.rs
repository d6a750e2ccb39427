//! Job posting management for company accounts.
//!
//! Posting consumes one slot from the company's plan entitlements; edits
//! go through the allow-listed patch and an ownership check.

use std::collections::BTreeSet;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use jobify_models::{Job, JobId, Role, SalaryRange};
use jobify_store::{JobPatch, Store};

use crate::error::{CoreError, CoreResult};
use crate::identity::{require_role, Identity};

/// Payload for a new posting. The company name and contact email come from
/// the authenticated account, never from the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub job_title: String,
    #[serde(default)]
    pub job_tags: BTreeSet<String>,
    pub category: String,
    pub job_type: String,
    pub location: String,
    #[serde(default)]
    pub salary: SalaryRange,
    pub expiration_date: DateTime<Utc>,
    #[serde(default)]
    pub featured: bool,
}

/// Outcome of a posting attempt.
#[derive(Debug)]
pub enum PostOutcome {
    Created(Job),
    /// Refused role check (candidates cannot post)
    PolicyViolation,
    /// The plan's job limit is used up
    LimitExhausted,
}

/// Outcome of a posting edit.
#[derive(Debug)]
pub enum PatchOutcome {
    Patched(Job),
    /// Refused role check, or the posting belongs to another company
    PolicyViolation,
}

/// Creates and edits postings on behalf of company accounts.
#[derive(Clone)]
pub struct PostingService {
    store: Arc<dyn Store>,
}

impl PostingService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a posting, consuming one job slot from the company's
    /// entitlements. The slot is consumed before the insert so a company
    /// at its limit never gets a half-created posting.
    pub async fn post(&self, identity: &Identity, new_job: NewJob) -> CoreResult<PostOutcome> {
        if require_role(identity, Role::Company, "post_job").is_err() {
            return Ok(PostOutcome::PolicyViolation);
        }
        if new_job.job_title.trim().is_empty() {
            return Err(CoreError::validation("job title must not be empty"));
        }
        if new_job.expiration_date <= Utc::now() {
            return Err(CoreError::validation("expiration date must be in the future"));
        }

        let company = self
            .store
            .companies()
            .get_by_email(&identity.email)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("company {}", identity.email)))?;

        if !self.store.companies().consume_job_slot(&identity.email).await? {
            info!(company = %company.company_name, "job limit exhausted");
            return Ok(PostOutcome::LimitExhausted);
        }

        let job = Job {
            id: JobId::new(),
            company_name: company.company_name.clone(),
            contact_email: identity.email.clone(),
            job_title: new_job.job_title,
            job_tags: new_job.job_tags,
            category: new_job.category,
            job_type: new_job.job_type,
            location: new_job.location,
            salary: new_job.salary,
            expiration_date: new_job.expiration_date,
            active: true,
            featured: new_job.featured,
            applications: 0,
            created_at: Utc::now(),
        };
        self.store.jobs().insert(&job).await?;

        info!(job_id = %job.id, company = %company.company_name, "posting created");
        Ok(PostOutcome::Created(job))
    }

    /// Edit a posting through the allow-listed patch. Only the owning
    /// company may edit; an empty patch skips the write.
    pub async fn patch(
        &self,
        identity: &Identity,
        job_id: &JobId,
        patch: JobPatch,
    ) -> CoreResult<PatchOutcome> {
        if require_role(identity, Role::Company, "patch_job").is_err() {
            return Ok(PatchOutcome::PolicyViolation);
        }

        let mut job = self
            .store
            .jobs()
            .get(job_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("job {}", job_id)))?;

        if job.contact_email != identity.email {
            info!(job_id = %job_id, actor = %identity.email, "patch refused: not the owner");
            return Ok(PatchOutcome::PolicyViolation);
        }

        if patch.is_empty() {
            return Ok(PatchOutcome::Patched(job));
        }

        let updated = self.store.jobs().apply_patch(job_id, &patch).await?;
        if !updated {
            return Err(CoreError::not_found(format!("job {}", job_id)));
        }
        patch.apply_to(&mut job);

        info!(job_id = %job_id, "posting patched");
        Ok(PatchOutcome::Patched(job))
    }

    /// Take a posting down early. An ownership-checked shorthand for
    /// patching `active = false`.
    pub async fn close(&self, identity: &Identity, job_id: &JobId) -> CoreResult<PatchOutcome> {
        self.patch(
            identity,
            job_id,
            JobPatch {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
    }
}
