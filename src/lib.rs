//! # Prisoners: 100 Prisoners Problem Simulator
//!
//! Measures, by Monte Carlo simulation, how often N prisoners all find their
//! own number when each may open at most `max_opens` of N boxes.
//!
//! ## Pipeline
//!
//! | Stage | Rust module | Description |
//! |-------|-------------|-------------|
//! | Generate | [`permutation`] | Uniform random bijection box → number (Fisher–Yates) |
//! | Evaluate | [`simulation::strategy`] | Per-prisoner search: random opening or cycle following |
//! | Aggregate | [`simulation::engine`] | T independent trials, reduced into a [`simulation::RunSummary`] |
//!
//! Each trial draws a fresh permutation, runs every prisoner against it, and
//! records how many succeeded. The summary carries the win probability
//! (all N succeeded) and the full histogram of per-trial success counts.
//!
//! ## Why cycle following wins
//!
//! A prisoner who starts at the box labelled with their own number and keeps
//! opening the box named by the slip just read walks the permutation cycle
//! containing their number. They succeed iff that cycle has length
//! ≤ `max_opens`, so everyone succeeds iff the longest cycle does. For
//! N = 100, `max_opens` = 50 that happens with probability ≈ 0.3118, versus
//! 2^-100 for independent random opening.
//!
//! ## Determinism
//!
//! Randomness is always injected. [`simulation::run_simulation`] seeds trial
//! `i` with `seed + i`, so the summary is identical for any rayon thread count.

pub mod constants;
pub mod env_config;
pub mod error;
pub mod permutation;
pub mod report;
pub mod simulation;
pub mod types;

pub use error::{ConfigurationError, Result};
pub use permutation::Permutation;
pub use simulation::{run_simulation, RunSummary};
pub use types::{SimulationConfig, StrategyKind};
