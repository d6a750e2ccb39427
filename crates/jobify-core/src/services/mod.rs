//! Core services.

pub mod accounts;
pub mod applications;
pub mod directory;
pub mod entitlements;
pub mod postings;
pub mod sweep;

pub use accounts::{
    AccountService, CandidateProfileUpdate, CompanyRegistration, NewUser, ProfileOutcome,
    SignupOutcome,
};
pub use applications::{ApplicationWorkflow, ApplyOutcome, BookmarkOutcome, TransitionOutcome};
pub use directory::DirectoryService;
pub use entitlements::{CheckoutUrls, CompletionOutcome, EntitlementService, PurchaseOutcome};
pub use postings::{NewJob, PatchOutcome, PostOutcome, PostingService};
pub use sweep::ExpirySweeper;
