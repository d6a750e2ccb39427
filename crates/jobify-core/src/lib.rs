//! Job directory query engine and application workflow.
//!
//! This crate provides:
//! - The directory service: listing, search, and enriched job/company views
//! - The application workflow state machine (apply, status change,
//!   interview scheduling, bookmarks)
//! - The plan/entitlement updater shared by both payment-completion paths
//! - The nightly expiry sweeper
//! - Collaborator seams: identity, notification sink, payment initiator

pub mod error;
pub mod identity;
pub mod metrics;
pub mod notify;
pub mod payments;
pub mod services;

pub use error::{CoreError, CoreResult};
pub use identity::{Denied, Identity};
pub use notify::{LogSink, Notification, NotificationSink, RecordingSink};
pub use payments::{DevGateway, PaymentInitiator, PaymentRequest, PaymentSession};
pub use services::accounts::{
    AccountService, CandidateProfileUpdate, CompanyRegistration, NewUser, ProfileOutcome,
    SignupOutcome,
};
pub use services::applications::{
    ApplicationWorkflow, ApplyOutcome, BookmarkOutcome, TransitionOutcome,
};
pub use services::directory::{
    AppliedJobView, CompanyListingEntry, CompanyListingPage, DirectoryService, JobDetail,
    JobListingEntry, JobListingPage, JobListingParams,
};
pub use services::entitlements::{
    CheckoutUrls, CompletionOutcome, EntitlementService, PurchaseOutcome,
};
pub use services::postings::{NewJob, PatchOutcome, PostOutcome, PostingService};
pub use services::sweep::ExpirySweeper;
