//! # Replica Metrics
//!
//! Prometheus metrics for monitoring checkpoint intake and message delivery.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-15-replica = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `replica_checkpoints_accepted_total` - Counter of accepted checkpoints
//! - `replica_checkpoints_rejected_total` - Counter of rejected checkpoints (by reason)
//! - `replica_messages_proven_total` - Counter of messages proven
//! - `replica_messages_processed_total` - Counter of dispatch attempts (by outcome)
//! - `replica_frontier_index` - Gauge of the highest accepted checkpoint index

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total checkpoints accepted
    pub static ref CHECKPOINTS_ACCEPTED: IntCounter = register_int_counter!(
        "replica_checkpoints_accepted_total",
        "Total number of checkpoints accepted"
    )
    .expect("Failed to create CHECKPOINTS_ACCEPTED metric");

    /// Total checkpoints rejected, labeled by reason
    pub static ref CHECKPOINTS_REJECTED: IntCounterVec = register_int_counter_vec!(
        "replica_checkpoints_rejected_total",
        "Total number of checkpoints rejected",
        &["reason"]
    )
    .expect("Failed to create CHECKPOINTS_REJECTED metric");

    /// Total messages proven
    pub static ref MESSAGES_PROVEN: IntCounter = register_int_counter!(
        "replica_messages_proven_total",
        "Total number of messages proven"
    )
    .expect("Failed to create MESSAGES_PROVEN metric");

    /// Total dispatch attempts, labeled by outcome
    pub static ref MESSAGES_PROCESSED: IntCounterVec = register_int_counter_vec!(
        "replica_messages_processed_total",
        "Total number of messages processed",
        &["outcome"]
    )
    .expect("Failed to create MESSAGES_PROCESSED metric");

    /// Highest accepted checkpoint index
    pub static ref FRONTIER_INDEX: IntGauge = register_int_gauge!(
        "replica_frontier_index",
        "Highest accepted checkpoint index"
    )
    .expect("Failed to create FRONTIER_INDEX metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record an accepted checkpoint
#[cfg(feature = "metrics")]
pub fn record_checkpoint_accepted(index: u32) {
    CHECKPOINTS_ACCEPTED.inc();
    FRONTIER_INDEX.set(i64::from(index));
}

/// Record a rejected checkpoint with reason
#[cfg(feature = "metrics")]
pub fn record_checkpoint_rejected(reason: &str) {
    CHECKPOINTS_REJECTED.with_label_values(&[reason]).inc();
}

/// Record a proven message
#[cfg(feature = "metrics")]
pub fn record_message_proven() {
    MESSAGES_PROVEN.inc();
}

/// Record a dispatch attempt
#[cfg(feature = "metrics")]
pub fn record_message_processed(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    MESSAGES_PROCESSED.with_label_values(&[outcome]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_checkpoint_accepted(_index: u32) {}

#[cfg(not(feature = "metrics"))]
pub fn record_checkpoint_rejected(_reason: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_message_proven() {}

#[cfg(not(feature = "metrics"))]
pub fn record_message_processed(_success: bool) {}
