//! Document-store seam for the Jobify backend.
//!
//! This crate provides:
//! - Per-collection repository traits (`JobStore`, `CompanyStore`, ...)
//! - The listing/search query builder with uniform pagination
//! - A store error taxonomy shared by all backends
//! - An in-memory store that enforces the composite uniqueness
//!   constraints on applications and bookmarks
//!
//! Nothing above this crate depends on a concrete database engine; a
//! production backend implements the same traits against its driver.

pub mod error;
pub mod memory;
pub mod metrics;
pub mod query;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use query::{CompanyFilter, JobFilter, Page, MIN_TERM_LEN};
pub use store::{
    ApplicationStore, BookmarkStore, CandidateStore, CompanyStore, JobPatch, JobStore, OrderStore,
    Store, UserPatch, UserStore,
};
