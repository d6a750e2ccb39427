//! Store metrics collection.
//!
//! Standardized counters for monitoring store operations across backends.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Total store operations by operation and collection.
    pub const OPERATIONS_TOTAL: &str = "store_operations_total";

    /// Total constraint conflicts by collection.
    pub const CONFLICTS_TOTAL: &str = "store_conflicts_total";
}

/// Record a completed store operation.
pub fn record_operation(operation: &'static str, collection: &'static str) {
    counter!(
        names::OPERATIONS_TOTAL,
        "operation" => operation,
        "collection" => collection
    )
    .increment(1);
}

/// Record a unique-constraint conflict.
pub fn record_conflict(collection: &'static str) {
    counter!(
        names::CONFLICTS_TOTAL,
        "collection" => collection
    )
    .increment(1);
}
