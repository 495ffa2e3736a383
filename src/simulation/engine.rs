//! Trial engine: runs T independent trials of the N-prisoner game.
//!
//! One trial: draw a fresh permutation, let every prisoner search it with the
//! chosen strategy, and count how many found their own number. All prisoners
//! are evaluated even after the first failure so the success-count histogram
//! is complete.
//!
//! ## Seeding
//!
//! [`run_simulation`] gives trial `i` its own `SmallRng` seeded with
//! `seed + i`, so trials are independent units of work that rayon may run in
//! any order; the per-trial tallies are merged by reduction and the summary
//! does not depend on the thread count. [`run_simulation_with_rng`] instead
//! drives every trial from one caller-supplied RNG, strictly in sequence.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, trace};

use crate::error::Result;
use crate::permutation::Permutation;
use crate::types::{SimulationConfig, StrategyKind};

use super::statistics::{RunSummary, TrialTally};
use super::strategy::{strategy_for, OpeningStrategy};

/// Outcome of a single trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialResult {
    /// Prisoners (0..=N) who found their own number.
    pub successes: usize,
    /// Every prisoner succeeded.
    pub all_succeeded: bool,
    /// Boxes opened, summed over all prisoners.
    pub boxes_opened: usize,
    /// Longest cycle of the trial's permutation.
    pub longest_cycle: usize,
}

/// Per-trial RNG for trial `index` of a run seeded with `seed`.
#[inline]
pub fn trial_rng(seed: u64, index: usize) -> SmallRng {
    SmallRng::seed_from_u64(seed.wrapping_add(index as u64))
}

/// Run every prisoner 1..=N against a fixed permutation.
pub fn evaluate_permutation(
    boxes: &Permutation,
    strategy: &dyn OpeningStrategy,
    max_opens: usize,
    rng: &mut dyn RngCore,
) -> TrialResult {
    let n = boxes.len();
    let mut successes = 0usize;
    let mut boxes_opened = 0usize;
    for prisoner in 1..=n {
        let search = strategy.search(prisoner, boxes, max_opens, &mut *rng);
        trace!(prisoner, found = search.found, opened = search.opened);
        boxes_opened += search.opened;
        if search.found {
            successes += 1;
        }
    }
    TrialResult {
        successes,
        all_succeeded: successes == n,
        boxes_opened,
        longest_cycle: boxes.longest_cycle(),
    }
}

/// One trial: fresh permutation, then every prisoner searches it.
///
/// Box contents stay fixed for the whole trial; under random opening only
/// the choice of boxes varies from prisoner to prisoner.
pub fn simulate_trial(
    config: &SimulationConfig,
    strategy: &dyn OpeningStrategy,
    rng: &mut dyn RngCore,
) -> TrialResult {
    let boxes = Permutation::random(config.prisoners, &mut *rng);
    evaluate_permutation(&boxes, strategy, config.max_opens, rng)
}

/// Run `config.trials` trials in parallel with a built-in strategy.
pub fn run_simulation(kind: StrategyKind, config: &SimulationConfig) -> Result<RunSummary> {
    run_with_strategy(strategy_for(kind), config)
}

/// Run `config.trials` trials in parallel with any strategy.
pub fn run_with_strategy(
    strategy: &dyn OpeningStrategy,
    config: &SimulationConfig,
) -> Result<RunSummary> {
    config.validate()?;
    let start = Instant::now();
    info!(
        strategy = strategy.name(),
        prisoners = config.prisoners,
        max_opens = config.max_opens,
        trials = config.trials,
        seed = config.seed,
        "starting simulation"
    );

    let n = config.prisoners;
    let tally = (0..config.trials)
        .into_par_iter()
        .fold(
            || TrialTally::new(n),
            |mut tally, i| {
                let mut rng = trial_rng(config.seed, i);
                tally.record(&simulate_trial(config, strategy, &mut rng));
                tally
            },
        )
        .reduce(|| TrialTally::new(n), TrialTally::merge);

    let summary = tally.finish(strategy.name(), config.max_opens, config.seed);
    log_finished(&summary, start);
    Ok(summary)
}

/// Run `config.trials` trials in sequence, all drawing from `rng`.
///
/// `config.seed` is not used to seed anything; it is only copied into the summary.
pub fn run_simulation_with_rng(
    kind: StrategyKind,
    config: &SimulationConfig,
    rng: &mut dyn RngCore,
) -> Result<RunSummary> {
    config.validate()?;
    let strategy = strategy_for(kind);
    let start = Instant::now();
    info!(
        strategy = strategy.name(),
        prisoners = config.prisoners,
        max_opens = config.max_opens,
        trials = config.trials,
        "starting sequential simulation"
    );

    let mut tally = TrialTally::new(config.prisoners);
    for i in 0..config.trials {
        let result = simulate_trial(config, strategy, &mut *rng);
        debug!(
            trial = i,
            "{}/{} found their number",
            result.successes,
            config.prisoners
        );
        tally.record(&result);
    }

    let summary = tally.finish(strategy.name(), config.max_opens, config.seed);
    log_finished(&summary, start);
    Ok(summary)
}

/// Run all trials in parallel, returning each trial's result in trial order.
///
/// Trial `i` here sees the same RNG stream as trial `i` of [`run_simulation`].
pub fn simulate_batch_with_recording(
    kind: StrategyKind,
    config: &SimulationConfig,
) -> Result<Vec<TrialResult>> {
    config.validate()?;
    let strategy = strategy_for(kind);
    Ok((0..config.trials)
        .into_par_iter()
        .map(|i| {
            let mut rng = trial_rng(config.seed, i);
            simulate_trial(config, strategy, &mut rng)
        })
        .collect())
}

/// Run all trials in sequence from `rng`, returning each trial's result.
///
/// Consumes `rng` exactly as [`run_simulation_with_rng`] does, so summarizing
/// the records reproduces that run's summary.
pub fn simulate_sequence_with_recording(
    kind: StrategyKind,
    config: &SimulationConfig,
    rng: &mut dyn RngCore,
) -> Result<Vec<TrialResult>> {
    config.validate()?;
    let strategy = strategy_for(kind);
    Ok((0..config.trials)
        .map(|_| simulate_trial(config, strategy, &mut *rng))
        .collect())
}

/// Aggregate recorded trial results into a summary.
pub fn summarize_records(
    kind: StrategyKind,
    config: &SimulationConfig,
    records: &[TrialResult],
) -> RunSummary {
    let mut tally = TrialTally::new(config.prisoners);
    for record in records {
        tally.record(record);
    }
    tally.finish(kind.name(), config.max_opens, config.seed)
}

fn log_finished(summary: &RunSummary, start: Instant) {
    info!(
        strategy = %summary.strategy,
        wins = summary.wins,
        trials = summary.trials,
        win_probability = summary.win_probability,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "simulation finished"
    );
}
