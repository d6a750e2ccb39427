//! Workflow metrics collection.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Workflow transitions by operation and outcome.
    pub const WORKFLOW_OUTCOMES_TOTAL: &str = "workflow_outcomes_total";

    /// Postings deactivated by the expiry sweep.
    pub const POSTINGS_EXPIRED_TOTAL: &str = "postings_expired_total";
}

/// Record a workflow transition outcome.
pub fn record_outcome(operation: &'static str, outcome: &'static str) {
    counter!(
        names::WORKFLOW_OUTCOMES_TOTAL,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record postings deactivated by a sweep cycle.
pub fn record_expired(count: u32) {
    counter!(names::POSTINGS_EXPIRED_TOTAL).increment(count as u64);
}
