//! Account management: signup, profile patching, deletion, and the
//! extended candidate profile.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use jobify_models::{CandidateProfile, Company, CompanyId, Entitlements, PlanTier, Role, User};
use jobify_store::{Store, UserPatch};

use crate::error::{CoreError, CoreResult};
use crate::identity::{require_role, Identity};

/// Signup payload. The role is fixed at signup and never patchable.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub role: Role,
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Company registration payload. Billing email comes from the account.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyRegistration {
    pub company_name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Candidate-profile payload, upserted as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateProfileUpdate {
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_summary: Option<String>,
    #[serde(default)]
    pub expected_salary: Option<u32>,
}

/// Outcome of a signup or registration.
#[derive(Debug)]
pub enum SignupOutcome {
    Created,
    /// The email is already taken; not an error, the client redirects to
    /// login instead
    AlreadyRegistered,
}

/// Outcome of a candidate-profile upsert.
#[derive(Debug)]
pub enum ProfileOutcome {
    Updated(CandidateProfile),
    /// Refused role check (company accounts have no candidate profile)
    PolicyViolation,
}

/// Account lifecycle operations.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a user account. A taken email is a soft outcome.
    pub async fn signup(&self, new_user: NewUser) -> CoreResult<SignupOutcome> {
        if new_user.email.trim().is_empty() || !new_user.email.contains('@') {
            return Err(CoreError::validation("a valid email is required"));
        }
        if new_user.name.trim().is_empty() {
            return Err(CoreError::validation("name must not be empty"));
        }

        let user = User {
            email: new_user.email,
            role: new_user.role,
            name: new_user.name,
            photo: new_user.photo,
            phone: None,
            location: None,
            created_at: Utc::now(),
        };
        match self.store.users().insert(&user).await {
            Ok(()) => {
                info!(email = %user.email, role = %user.role, "account created");
                Ok(SignupOutcome::Created)
            }
            Err(e) if e.is_already_exists() => Ok(SignupOutcome::AlreadyRegistered),
            Err(e) => Err(e.into()),
        }
    }

    /// Register the company record for a company account. Plan starts at
    /// `none` with zero entitlements until a purchase completes.
    pub async fn register_company(
        &self,
        identity: &Identity,
        registration: CompanyRegistration,
    ) -> CoreResult<SignupOutcome> {
        if require_role(identity, Role::Company, "register_company").is_err() {
            return Err(CoreError::validation(
                "only company accounts can register a company",
            ));
        }
        if registration.company_name.trim().is_empty() {
            return Err(CoreError::validation("company name must not be empty"));
        }
        if self
            .store
            .companies()
            .get_by_email(&identity.email)
            .await?
            .is_some()
        {
            return Ok(SignupOutcome::AlreadyRegistered);
        }

        let company = Company {
            id: CompanyId::new(),
            company_name: registration.company_name,
            email: identity.email.clone(),
            logo: registration.logo,
            website: registration.website,
            description: registration.description,
            location: registration.location,
            plan: PlanTier::None,
            entitlements: Entitlements::default(),
            featured: false,
            created_at: Utc::now(),
        };
        self.store.companies().insert(&company).await?;

        info!(company = %company.company_name, email = %identity.email, "company registered");
        Ok(SignupOutcome::Created)
    }

    /// Fetch the caller's own account record.
    pub async fn profile(&self, identity: &Identity) -> CoreResult<User> {
        self.store
            .users()
            .get(&identity.email)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("user {}", identity.email)))
    }

    /// Patch the caller's own profile through the allow-list. Email and
    /// role are not patchable by construction.
    pub async fn patch_profile(&self, identity: &Identity, patch: UserPatch) -> CoreResult<User> {
        if !patch.is_empty() {
            let updated = self.store.users().apply_patch(&identity.email, &patch).await?;
            if !updated {
                return Err(CoreError::not_found(format!("user {}", identity.email)));
            }
        }
        self.profile(identity).await
    }

    /// Delete the caller's own account.
    pub async fn delete_account(&self, identity: &Identity) -> CoreResult<()> {
        let deleted = self.store.users().delete(&identity.email).await?;
        if !deleted {
            return Err(CoreError::not_found(format!("user {}", identity.email)));
        }
        info!(email = %identity.email, "account deleted");
        Ok(())
    }

    /// Role lookup by email, for clients deciding which dashboard to show.
    pub async fn role_of(&self, email: &str) -> CoreResult<Option<Role>> {
        Ok(self.store.users().get(email).await?.map(|u| u.role))
    }

    /// Upsert the caller's extended candidate profile.
    pub async fn upsert_candidate_profile(
        &self,
        identity: &Identity,
        update: CandidateProfileUpdate,
    ) -> CoreResult<ProfileOutcome> {
        if require_role(identity, Role::Candidate, "upsert_candidate_profile").is_err() {
            return Ok(ProfileOutcome::PolicyViolation);
        }

        let profile = CandidateProfile {
            candidate_email: identity.email.clone(),
            resume_url: update.resume_url,
            skills: update.skills,
            experience_summary: update.experience_summary,
            expected_salary: update.expected_salary,
            updated_at: Utc::now(),
        };
        self.store.candidates().upsert(&profile).await?;
        Ok(ProfileOutcome::Updated(profile))
    }

    /// Fetch a candidate's extended profile.
    pub async fn candidate_profile(&self, candidate_email: &str) -> CoreResult<Option<CandidateProfile>> {
        Ok(self.store.candidates().get(candidate_email).await?)
    }
}
