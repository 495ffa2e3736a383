//! Trial simulation and statistics.
//!
//! - [`strategy`]: Per-prisoner box-opening rules (random, cycle following)
//! - [`engine`]: Core simulation (run T trials, parallel or sequential)
//! - [`statistics`]: Tallies, run summary, reference distributions
//! - [`raw_storage`]: Binary I/O for per-trial success counts

pub mod engine;
pub mod raw_storage;
pub mod statistics;
pub mod strategy;

// Re-export commonly used items
pub use engine::{
    evaluate_permutation, run_simulation, run_simulation_with_rng, run_with_strategy,
    simulate_batch_with_recording, simulate_sequence_with_recording, simulate_trial,
    summarize_records, trial_rng, TrialResult,
};
pub use raw_storage::{
    load_success_counts, save_success_counts, SuccessCountsHeader, SUCCESS_COUNTS_MAGIC,
    SUCCESS_COUNTS_VERSION,
};
pub use statistics::{
    binomial_pmf, load_summary, save_summary, total_variation_distance, RunSummary, TrialTally,
};
pub use strategy::{strategy_for, CycleFollowing, OpeningStrategy, RandomOpening, Search};
