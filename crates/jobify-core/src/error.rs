//! Core error types.
//!
//! Soft outcomes (duplicate apply, policy violation) are not errors; they
//! are modeled as variants of the workflow outcome enums. Errors here are
//! the conditions a caller must be told about explicitly.

use thiserror::Error;

use jobify_store::StoreError;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced by the directory and workflow services.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input, rejected before any store round-trip.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The addressed record does not exist; distinct from a server fault.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store fault, or a constraint violation that no workflow translated
    /// into a soft outcome.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An external collaborator (payment gateway) refused or failed.
    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}
