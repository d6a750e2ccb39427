//! Shared data models for the Jobify backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job postings and their public views
//! - Companies and plan entitlements
//! - Users, candidates, and roles
//! - Applications, bookmarks, and orders

pub mod application;
pub mod bookmark;
pub mod candidate;
pub mod company;
pub mod job;
pub mod order;
pub mod plan;
pub mod user;

// Re-export common types
pub use application::{Application, ApplicationId, ApplicationStatus, InterviewDetails};
pub use bookmark::Bookmark;
pub use candidate::CandidateProfile;
pub use company::{Company, CompanyId, CompanyPublic};
pub use job::{Job, JobId, JobPublic, SalaryRange};
pub use order::Order;
pub use plan::{Entitlements, PlanTier, PlanTierParseError};
pub use user::{Role, User};
