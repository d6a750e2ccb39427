//! Authenticated identity and the consolidated role check.

use tracing::warn;

use jobify_models::Role;

/// The (email, role) pair supplied by the identity provider. The core
/// trusts this pair as-is; token mechanics live outside this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    pub fn candidate(email: impl Into<String>) -> Self {
        Self::new(email, Role::Candidate)
    }

    pub fn company(email: impl Into<String>) -> Self {
        Self::new(email, Role::Company)
    }
}

/// Marker for a refused role check. Workflows translate this into their
/// policy-violation outcome; it never becomes an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denied {
    pub required: Role,
}

/// The single authorization check invoked before each workflow transition.
pub fn require_role(identity: &Identity, required: Role, action: &'static str) -> Result<(), Denied> {
    if identity.role == required {
        Ok(())
    } else {
        warn!(
            actor = %identity.email,
            role = %identity.role,
            required = %required,
            action,
            "role check refused"
        );
        Err(Denied { required })
    }
}
