//! The application workflow state machine.
//!
//! Every transition runs the same shape: role check, storage write,
//! best-effort notification. Duplicates and refused role checks are soft
//! outcomes, not errors; only store faults and missing records fail.

use std::sync::Arc;

use tracing::{info, warn};

use jobify_models::{
    Application, ApplicationId, ApplicationStatus, Bookmark, InterviewDetails, JobId, Role,
};
use jobify_store::Store;

use crate::error::{CoreError, CoreResult};
use crate::identity::{require_role, Identity};
use crate::metrics::record_outcome;
use crate::notify::{
    applied_message, interview_message, status_changed_message, Notification, NotificationSink,
};

/// Outcome of an apply attempt.
#[derive(Debug)]
pub enum ApplyOutcome {
    Applied { application: Application },
    /// The candidate already applied to this job
    Duplicate,
    /// Refused role check (company accounts cannot apply)
    PolicyViolation,
}

/// Outcome of a bookmark attempt.
#[derive(Debug)]
pub enum BookmarkOutcome {
    Bookmarked { bookmark: Bookmark },
    AlreadyBookmarked,
    PolicyViolation,
}

/// Outcome of a company-side transition (status change, interview).
#[derive(Debug)]
pub enum TransitionOutcome {
    Updated { application: Application },
    PolicyViolation,
}

/// Drives applications and bookmarks through their transitions.
#[derive(Clone)]
pub struct ApplicationWorkflow {
    store: Arc<dyn Store>,
    sink: Arc<dyn NotificationSink>,
}

impl ApplicationWorkflow {
    pub fn new(store: Arc<dyn Store>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { store, sink }
    }

    /// Apply to a job. The store's composite-key constraint is the single
    /// authority on duplicates; there is no read-then-write race window.
    pub async fn apply(&self, identity: &Identity, job_id: &JobId) -> CoreResult<ApplyOutcome> {
        if require_role(identity, Role::Candidate, "apply").is_err() {
            record_outcome("apply", "policy_violation");
            return Ok(ApplyOutcome::PolicyViolation);
        }

        let job = self
            .store
            .jobs()
            .get(job_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("job {}", job_id)))?;

        let application = Application::new(job_id.clone(), identity.email.clone());
        match self.store.applications().insert(&application).await {
            Ok(()) => {}
            Err(e) if e.is_already_exists() => {
                record_outcome("apply", "duplicate");
                info!(job_id = %job_id, candidate = %identity.email, "duplicate apply");
                return Ok(ApplyOutcome::Duplicate);
            }
            Err(e) => return Err(e.into()),
        }

        // The application record is authoritative; a failed counter bump is
        // logged and not rolled back.
        if let Err(e) = self.store.jobs().increment_applications(job_id).await {
            warn!(job_id = %job_id, error = %e, "failed to bump application counter");
        }

        self.dispatch(applied_message(
            &identity.email,
            &job.job_title,
            &job.company_name,
        ))
        .await;

        record_outcome("apply", "applied");
        info!(job_id = %job_id, candidate = %identity.email, "application created");
        Ok(ApplyOutcome::Applied { application })
    }

    /// Bookmark a job. Same constraint shape as apply, minus the counter
    /// and the notification.
    pub async fn bookmark(
        &self,
        identity: &Identity,
        job_id: &JobId,
    ) -> CoreResult<BookmarkOutcome> {
        if require_role(identity, Role::Candidate, "bookmark").is_err() {
            return Ok(BookmarkOutcome::PolicyViolation);
        }

        if self.store.jobs().get(job_id).await?.is_none() {
            return Err(CoreError::not_found(format!("job {}", job_id)));
        }

        let bookmark = Bookmark::new(job_id.clone(), identity.email.clone());
        match self.store.bookmarks().insert(&bookmark).await {
            Ok(()) => Ok(BookmarkOutcome::Bookmarked { bookmark }),
            Err(e) if e.is_already_exists() => Ok(BookmarkOutcome::AlreadyBookmarked),
            Err(e) => Err(e.into()),
        }
    }

    /// Change an application's status. A caller-supplied applicant email
    /// must match the record's candidate_email; the notification always
    /// goes to the stored address.
    pub async fn update_status(
        &self,
        identity: &Identity,
        application_id: &ApplicationId,
        status: ApplicationStatus,
        applicant_email: Option<&str>,
    ) -> CoreResult<TransitionOutcome> {
        if require_role(identity, Role::Company, "update_status").is_err() {
            return Ok(TransitionOutcome::PolicyViolation);
        }

        let mut application = self
            .store
            .applications()
            .get(application_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("application {}", application_id)))?;

        if let Some(email) = applicant_email {
            if email != application.candidate_email {
                return Err(CoreError::validation(
                    "applicant email does not match the application record",
                ));
            }
        }

        let updated = self
            .store
            .applications()
            .update_status(application_id, status.clone())
            .await?;
        if !updated {
            return Err(CoreError::not_found(format!(
                "application {}",
                application_id
            )));
        }
        application.status = status.clone();

        self.dispatch(status_changed_message(&application.candidate_email, &status))
            .await;

        info!(application_id = %application_id, status = %status, "application status changed");
        Ok(TransitionOutcome::Updated { application })
    }

    /// Schedule (or amend) an interview. Merges the allow-listed details
    /// into the record, moves the status to `Interview`, and notifies the
    /// candidate with the scheduling details.
    pub async fn schedule_interview(
        &self,
        identity: &Identity,
        application_id: &ApplicationId,
        details: InterviewDetails,
    ) -> CoreResult<TransitionOutcome> {
        if require_role(identity, Role::Company, "schedule_interview").is_err() {
            return Ok(TransitionOutcome::PolicyViolation);
        }

        let mut application = self
            .store
            .applications()
            .get(application_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("application {}", application_id)))?;

        let updated = self
            .store
            .applications()
            .merge_interview(application_id, &details, Some(ApplicationStatus::Interview))
            .await?;
        if !updated {
            return Err(CoreError::not_found(format!(
                "application {}",
                application_id
            )));
        }
        application.interview.merge(&details);
        application.status = ApplicationStatus::Interview;

        self.dispatch(interview_message(
            &application.candidate_email,
            &application.interview,
        ))
        .await;

        info!(application_id = %application_id, "interview scheduled");
        Ok(TransitionOutcome::Updated { application })
    }

    /// Best-effort send. A sink failure is logged and swallowed; the
    /// workflow step that triggered it stands.
    async fn dispatch(&self, notification: Notification) {
        let to = notification.to.clone();
        if let Err(e) = self.sink.send(notification).await {
            warn!(to = %to, error = %e, "notification dispatch failed");
        }
    }
}
