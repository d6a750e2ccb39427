//! Listing/search query builder and pagination.
//!
//! Translates caller-supplied listing parameters into filter predicates
//! and a (skip, limit) window shared by every backend.

use jobify_models::{Company, CompanyId, Job};

use crate::error::{StoreError, StoreResult};

// ============================================================================
// Pagination
// ============================================================================

/// Pagination limits.
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// A normalized (page, limit) window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    /// Normalize raw parameters: page clamps to >= 1, limit defaults to 10
    /// and clamps to [1, 100].
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = match limit {
            Some(0) | None => DEFAULT_LIMIT,
            Some(l) => l.min(MAX_LIMIT),
        };
        Self { page, limit }
    }

    /// Number of items to skip before this page.
    pub fn skip(&self) -> usize {
        ((self.page - 1) as usize) * (self.limit as usize)
    }

    /// Apply the window to an already-filtered, stably-ordered sequence.
    /// Requests beyond the last page yield an empty vector, not an error.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.skip())
            .take(self.limit as usize)
            .collect()
    }
}

// ============================================================================
// Job filter
// ============================================================================

/// Minimum length for free-text search terms.
pub const MIN_TERM_LEN: usize = 3;

/// Filter predicate for job listings and search.
///
/// Text terms match case-insensitively as substrings; absent filters match
/// everything.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    /// Exact category match
    pub category: Option<String>,
    /// Exact tag membership
    pub tag: Option<String>,
    pub featured: Option<bool>,
    /// Exact owning-company match
    pub company_name: Option<String>,
    /// Only active postings when true
    pub active_only: bool,
}

impl JobFilter {
    /// Reject free-text terms shorter than [`MIN_TERM_LEN`]. Called before
    /// any store round-trip so an invalid request performs no query.
    pub fn validate(&self) -> StoreResult<()> {
        for (name, term) in [
            ("title", &self.title),
            ("location", &self.location),
            ("type", &self.job_type),
        ] {
            if let Some(t) = term {
                if t.chars().count() < MIN_TERM_LEN {
                    return Err(StoreError::invalid_query(format!(
                        "search term '{}' must have at least {} characters",
                        name, MIN_TERM_LEN
                    )));
                }
            }
        }
        Ok(())
    }

    /// Evaluate the predicate against a job record.
    pub fn matches(&self, job: &Job) -> bool {
        if self.active_only && !job.active {
            return false;
        }
        if let Some(ref t) = self.title {
            if !contains_ci(&job.job_title, t) {
                return false;
            }
        }
        if let Some(ref l) = self.location {
            if !contains_ci(&job.location, l) {
                return false;
            }
        }
        if let Some(ref ty) = self.job_type {
            if !contains_ci(&job.job_type, ty) {
                return false;
            }
        }
        if let Some(ref c) = self.category {
            if &job.category != c {
                return false;
            }
        }
        if let Some(ref tag) = self.tag {
            if !job.job_tags.contains(tag) {
                return false;
            }
        }
        if let Some(f) = self.featured {
            if job.featured != f {
                return false;
            }
        }
        if let Some(ref name) = self.company_name {
            if &job.company_name != name {
                return false;
            }
        }
        true
    }
}

/// Case-insensitive substring match.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ============================================================================
// Company filter
// ============================================================================

/// Filter predicate for company listings. Both filters are exact matches.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub id: Option<CompanyId>,
}

impl CompanyFilter {
    pub fn matches(&self, company: &Company) -> bool {
        if let Some(ref name) = self.name {
            if &company.company_name != name {
                return false;
            }
        }
        if let Some(ref id) = self.id {
            if &company.id != id {
                return false;
            }
        }
        true
    }
}
