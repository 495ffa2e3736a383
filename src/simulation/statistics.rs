//! Aggregation of per-trial results into a run summary.
//!
//! [`TrialTally`] is a mergeable accumulator: trials can be recorded in any
//! order or split across threads and reduced with [`TrialTally::merge`].
//! [`TrialTally::finish`] turns it into the serializable [`RunSummary`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::engine::TrialResult;

// ── Accumulator ─────────────────────────────────────────────────────

/// Running counters for a set of trials with the same N.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialTally {
    pub prisoners: usize,
    pub trials: u64,
    pub wins: u64,
    /// `success_counts[k]` = trials in which exactly k prisoners succeeded.
    pub success_counts: Vec<u64>,
    /// `longest_cycle_counts[k]` = trials whose permutation's longest cycle was k.
    pub longest_cycle_counts: Vec<u64>,
    pub boxes_opened: u64,
}

impl TrialTally {
    pub fn new(prisoners: usize) -> Self {
        Self {
            prisoners,
            trials: 0,
            wins: 0,
            success_counts: vec![0; prisoners + 1],
            longest_cycle_counts: vec![0; prisoners + 1],
            boxes_opened: 0,
        }
    }

    pub fn record(&mut self, result: &TrialResult) {
        self.trials += 1;
        if result.all_succeeded {
            self.wins += 1;
        }
        self.success_counts[result.successes] += 1;
        self.longest_cycle_counts[result.longest_cycle] += 1;
        self.boxes_opened += result.boxes_opened as u64;
    }

    /// Combine two tallies over the same N.
    pub fn merge(mut self, other: TrialTally) -> TrialTally {
        debug_assert_eq!(self.prisoners, other.prisoners);
        self.trials += other.trials;
        self.wins += other.wins;
        for (a, b) in self.success_counts.iter_mut().zip(&other.success_counts) {
            *a += b;
        }
        for (a, b) in self
            .longest_cycle_counts
            .iter_mut()
            .zip(&other.longest_cycle_counts)
        {
            *a += b;
        }
        self.boxes_opened += other.boxes_opened;
        self
    }

    pub fn finish(&self, strategy: &str, max_opens: usize, seed: u64) -> RunSummary {
        let n = self.prisoners;
        let trials = self.trials.max(1) as f64;

        let success_histogram: BTreeMap<usize, f64> = self
            .success_counts
            .iter()
            .enumerate()
            .map(|(k, &c)| (k, c as f64 / trials))
            .collect();

        let longest_cycle_histogram: BTreeMap<usize, f64> = self
            .longest_cycle_counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(k, &c)| (k, c as f64 / trials))
            .collect();

        let mean: f64 = self
            .success_counts
            .iter()
            .enumerate()
            .map(|(k, &c)| k as f64 * c as f64)
            .sum::<f64>()
            / trials;
        let variance: f64 = self
            .success_counts
            .iter()
            .enumerate()
            .map(|(k, &c)| (k as f64 - mean).powi(2) * c as f64)
            .sum::<f64>()
            / trials;

        let win_probability = self.wins as f64 / trials;
        let prisoner_turns = trials * n as f64;

        RunSummary {
            strategy: strategy.to_string(),
            prisoners: n,
            max_opens,
            seed,
            trials: self.trials,
            wins: self.wins,
            win_probability,
            standard_error: (win_probability * (1.0 - win_probability) / trials).sqrt(),
            success_histogram,
            success_counts: self.success_counts.clone(),
            mean_successes: mean,
            std_dev_successes: variance.sqrt(),
            per_prisoner_success_rate: mean / n.max(1) as f64,
            mean_boxes_opened: self.boxes_opened as f64 / prisoner_turns.max(1.0),
            longest_cycle_histogram,
        }
    }
}

// ── Summary ─────────────────────────────────────────────────────────

/// Outcome of a full run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub strategy: String,
    pub prisoners: usize,
    pub max_opens: usize,
    pub seed: u64,
    pub trials: u64,
    /// Trials in which all N prisoners succeeded.
    pub wins: u64,
    /// wins / trials.
    pub win_probability: f64,
    /// Binomial standard error of `win_probability`.
    pub standard_error: f64,
    /// Success count k (0..=N) → fraction of trials with exactly k successes.
    pub success_histogram: BTreeMap<usize, f64>,
    /// Raw trial counts behind `success_histogram`.
    pub success_counts: Vec<u64>,
    pub mean_successes: f64,
    pub std_dev_successes: f64,
    pub per_prisoner_success_rate: f64,
    /// Mean boxes opened per prisoner turn.
    pub mean_boxes_opened: f64,
    /// Longest cycle length → fraction of trials (sparse).
    pub longest_cycle_histogram: BTreeMap<usize, f64>,
}

impl RunSummary {
    /// Fraction of trials with exactly `successes` successes.
    pub fn frequency(&self, successes: usize) -> f64 {
        self.success_histogram
            .get(&successes)
            .copied()
            .unwrap_or(0.0)
    }

    /// Histogram as a dense vector indexed by success count.
    pub fn histogram_vec(&self) -> Vec<f64> {
        (0..=self.prisoners).map(|k| self.frequency(k)).collect()
    }
}

// ── Reference distributions ─────────────────────────────────────────

/// Binomial(n, p) probability mass for k = 0..=n.
///
/// Under random opening each prisoner independently succeeds with
/// p = max_opens / N, so the success-count histogram should approach this.
pub fn binomial_pmf(n: usize, p: f64) -> Vec<f64> {
    if p <= 0.0 {
        let mut pmf = vec![0.0; n + 1];
        pmf[0] = 1.0;
        return pmf;
    }
    if p >= 1.0 {
        let mut pmf = vec![0.0; n + 1];
        pmf[n] = 1.0;
        return pmf;
    }
    // Log space keeps C(n, k) finite for large n.
    let ln_p = p.ln();
    let ln_q = (1.0 - p).ln();
    let mut ln_choose = 0.0f64;
    let mut pmf = Vec::with_capacity(n + 1);
    for k in 0..=n {
        if k > 0 {
            ln_choose += ((n - k + 1) as f64).ln() - (k as f64).ln();
        }
        pmf.push((ln_choose + k as f64 * ln_p + (n - k) as f64 * ln_q).exp());
    }
    pmf
}

/// Total variation distance ½ Σ |a_k − b_k| (missing tail entries count as 0).
pub fn total_variation_distance(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().max(b.len());
    (0..len)
        .map(|k| {
            let x = a.get(k).copied().unwrap_or(0.0);
            let y = b.get(k).copied().unwrap_or(0.0);
            (x - y).abs()
        })
        .sum::<f64>()
        / 2.0
}

/// Write the summary as pretty JSON, creating parent directories.
pub fn save_summary(summary: &RunSummary, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)
}

/// Read a summary written by [`save_summary`].
pub fn load_summary(path: &Path) -> std::io::Result<RunSummary> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
