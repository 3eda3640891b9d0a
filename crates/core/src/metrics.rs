//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Ranking (outcomes per request, feasible sub-units)
//! - Seating (chains discovered, selections)
//! - Exclusion store (recorded, pruned, unreadable state)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Ranking Metrics
// =============================================================================

/// Ranked requests total by outcome.
pub static RANK_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("seatscout_rank_outcomes_total", "Ranked requests by outcome"),
        &["outcome"], // "matched", "no_category", "no_capacity", "invalid_quantity"
    )
    .unwrap()
});

/// Feasible sub-units per matched request.
pub static CANDIDATE_SUB_UNITS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "seatscout_candidate_sub_units",
            "Number of feasible sub-units per matched request",
        )
        .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        &["kind"], // "area", "block"
    )
    .unwrap()
});

// =============================================================================
// Seating Metrics
// =============================================================================

/// Chains found per discovery.
pub static CHAINS_FOUND: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "seatscout_chains_found",
            "Number of adjacency chains found per discovery",
        )
        .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0]),
    )
    .unwrap()
});

/// Chain selections total by policy and result.
pub static SELECTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("seatscout_selections_total", "Chain selections"),
        &["policy", "result"], // policy: "biggest", "random"; result: "selected", "empty"
    )
    .unwrap()
});

// =============================================================================
// Exclusion Metrics
// =============================================================================

/// Seat ids added to the exclusion set.
pub static EXCLUSIONS_RECORDED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "seatscout_exclusions_recorded_total",
        "Seat ids added to the exclusion set",
    )
    .unwrap()
});

/// Expired exclusion entries removed.
pub static EXCLUSIONS_PRUNED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "seatscout_exclusions_pruned_total",
        "Expired exclusion entries removed",
    )
    .unwrap()
});

/// Stored exclusion state that could not be read.
pub static EXCLUSION_LOAD_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "seatscout_exclusion_load_failures_total",
        "Times the stored exclusion state was unreadable and treated as empty",
    )
    .unwrap()
});

/// Returns all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Ranking
        Box::new(RANK_OUTCOMES.clone()),
        Box::new(CANDIDATE_SUB_UNITS.clone()),
        // Seating
        Box::new(CHAINS_FOUND.clone()),
        Box::new(SELECTIONS.clone()),
        // Exclusions
        Box::new(EXCLUSIONS_RECORDED.clone()),
        Box::new(EXCLUSIONS_PRUNED.clone()),
        Box::new(EXCLUSION_LOAD_FAILURES.clone()),
    ]
}
