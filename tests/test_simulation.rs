//! Statistical and end-to-end tests for full simulation runs.
//!
//! All runs use fixed seeds, so every assertion is deterministic; tolerances
//! are several standard errors wide for the trial counts used.

use rand::RngCore;

use prisoners::simulation::{
    binomial_pmf, load_success_counts, load_summary, run_simulation, run_simulation_with_rng,
    run_with_strategy, save_success_counts, save_summary, simulate_batch_with_recording,
    summarize_records, total_variation_distance, trial_rng, OpeningStrategy, Search,
};
use prisoners::{ConfigurationError, Permutation, SimulationConfig, StrategyKind};

/// Probability that a random permutation of 100 has no cycle longer than 50.
const CYCLE_WIN_PROBABILITY_100: f64 = 0.311_827_8;

fn classic(trials: usize) -> SimulationConfig {
    SimulationConfig::new(100, 50, trials).unwrap()
}

// ── Cycle strategy ───────────────────────────────────────────────────

#[test]
fn cycle_classic_win_rate_near_31_percent() {
    let s = run_simulation(StrategyKind::Cycle, &classic(10_000)).unwrap();
    assert_eq!(s.trials, 10_000);
    assert!(
        (s.win_probability - CYCLE_WIN_PROBABILITY_100).abs() < 0.02,
        "win_probability={}",
        s.win_probability
    );
    assert!((s.frequency(100) - s.win_probability).abs() < 1e-12);
}

#[test]
fn cycle_classic_success_counts_51_to_99_impossible() {
    let s = run_simulation(StrategyKind::Cycle, &classic(10_000)).unwrap();
    for k in 51..=99 {
        assert_eq!(s.success_counts[k], 0, "k={k}");
        assert_eq!(s.frequency(k), 0.0, "k={k}");
    }
    // Some trials do fail, and then at most 49 succeed.
    let partial: u64 = s.success_counts[..=49].iter().sum();
    assert_eq!(partial + s.wins, s.trials);
    assert!(partial > 0);
}

#[test]
fn cycle_win_iff_longest_cycle_at_most_max_opens() {
    let s = run_simulation(StrategyKind::Cycle, &classic(5_000)).unwrap();
    let fits: f64 = s
        .longest_cycle_histogram
        .iter()
        .filter(|&(&len, _)| len <= 50)
        .map(|(_, &f)| f)
        .sum();
    assert!((fits - s.win_probability).abs() < 1e-9);
}

#[test]
fn cycle_mean_opens_is_mean_cycle_length_with_unlimited_opens() {
    // The cycle through a fixed element is uniform on 1..=N: mean (N + 1) / 2.
    let s = run_simulation(StrategyKind::Cycle, &SimulationConfig::new(100, 100, 5_000).unwrap())
        .unwrap();
    assert!(
        (s.mean_boxes_opened - 50.5).abs() < 1.5,
        "mean_boxes_opened={}",
        s.mean_boxes_opened
    );
}

// ── Random strategy ──────────────────────────────────────────────────

#[test]
fn random_per_prisoner_rate_converges_to_half() {
    let s = run_simulation(StrategyKind::Random, &classic(10_000)).unwrap();
    assert!(
        (s.per_prisoner_success_rate - 0.5).abs() < 0.01,
        "rate={}",
        s.per_prisoner_success_rate
    );
    // (1/2)^100: never observed.
    assert_eq!(s.wins, 0);
}

#[test]
fn random_histogram_matches_binomial() {
    let s = run_simulation(StrategyKind::Random, &classic(10_000)).unwrap();
    let tvd = total_variation_distance(&s.histogram_vec(), &binomial_pmf(100, 0.5));
    assert!(tvd < 0.05, "tvd={tvd}");
    assert!((s.mean_successes - 50.0).abs() < 0.5);
    assert!((s.std_dev_successes - 5.0).abs() < 0.5);
}

// ── Boundaries ───────────────────────────────────────────────────────

#[test]
fn all_boxes_open_always_wins() {
    for n in [1, 7, 100] {
        let config = SimulationConfig::new(n, n, 200).unwrap();
        for kind in StrategyKind::ALL {
            let s = run_simulation(kind, &config).unwrap();
            assert_eq!(s.win_probability, 1.0, "n={n} kind={kind}");
            assert_eq!(s.frequency(n), 1.0);
        }
    }
}

#[test]
fn zero_opens_never_wins() {
    for n in [1, 7, 100] {
        let config = SimulationConfig::new(n, 0, 200).unwrap();
        for kind in StrategyKind::ALL {
            let s = run_simulation(kind, &config).unwrap();
            assert_eq!(s.win_probability, 0.0, "n={n} kind={kind}");
            assert_eq!(s.frequency(0), 1.0);
            assert_eq!(s.mean_boxes_opened, 0.0);
        }
    }
}

#[test]
fn single_prisoner_one_open_always_wins() {
    let s = run_simulation(StrategyKind::Cycle, &SimulationConfig::new(1, 1, 10).unwrap()).unwrap();
    assert_eq!(s.wins, 10);
}

#[test]
fn invalid_configurations_rejected() {
    let base = SimulationConfig::default();
    let cases = [
        (
            SimulationConfig {
                prisoners: 0,
                max_opens: 0,
                ..base
            },
            ConfigurationError::NoPrisoners,
        ),
        (
            SimulationConfig {
                max_opens: 101,
                ..base
            },
            ConfigurationError::MaxOpensExceedsBoxes {
                max_opens: 101,
                n: 100,
            },
        ),
        (
            SimulationConfig { trials: 0, ..base },
            ConfigurationError::NoTrials,
        ),
    ];
    for (config, expected) in cases {
        for kind in StrategyKind::ALL {
            assert_eq!(run_simulation(kind, &config), Err(expected.clone()));
        }
    }
}

// ── Summary shape and determinism ────────────────────────────────────

#[test]
fn histogram_has_every_key_and_sums_to_one() {
    let s = run_simulation(StrategyKind::Random, &SimulationConfig::new(20, 10, 1_000).unwrap())
        .unwrap();
    let keys: Vec<usize> = s.success_histogram.keys().copied().collect();
    assert_eq!(keys, (0..=20).collect::<Vec<_>>());
    let total: f64 = s.success_histogram.values().sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(s.success_counts.iter().sum::<u64>(), 1_000);
}

#[test]
fn same_seed_same_summary_different_seed_different_summary() {
    let config = classic(2_000).with_seed(1234);
    let a = run_simulation(StrategyKind::Cycle, &config).unwrap();
    let b = run_simulation(StrategyKind::Cycle, &config).unwrap();
    assert_eq!(a, b);

    let c = run_simulation(StrategyKind::Cycle, &config.with_seed(4321)).unwrap();
    assert_ne!(a.success_counts, c.success_counts);
}

#[test]
fn sequential_run_reproducible_from_injected_rng() {
    let config = SimulationConfig::new(30, 15, 2_000).unwrap();
    let a = run_simulation_with_rng(StrategyKind::Cycle, &config, &mut trial_rng(77, 0)).unwrap();
    let b = run_simulation_with_rng(StrategyKind::Cycle, &config, &mut trial_rng(77, 0)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.trials, 2_000);
}

#[test]
fn custom_strategy_through_trait() {
    /// Open only one's own box.
    struct OwnBoxOnly;

    impl OpeningStrategy for OwnBoxOnly {
        fn name(&self) -> &str {
            "own-box"
        }

        fn search(
            &self,
            prisoner: usize,
            boxes: &Permutation,
            max_opens: usize,
            _rng: &mut dyn RngCore,
        ) -> Search {
            if max_opens == 0 {
                return Search {
                    found: false,
                    opened: 0,
                };
            }
            Search {
                found: boxes.contents(prisoner) == prisoner,
                opened: 1,
            }
        }
    }

    let s = run_with_strategy(&OwnBoxOnly, &SimulationConfig::new(10, 5, 5_000).unwrap()).unwrap();
    assert_eq!(s.strategy, "own-box");
    // Expected number of fixed points of a random permutation is 1.
    assert!((s.mean_successes - 1.0).abs() < 0.1, "mean={}", s.mean_successes);
    assert_eq!(s.mean_boxes_opened, 1.0);
}

// ── Persistence ──────────────────────────────────────────────────────

#[test]
fn recorded_run_persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let config = classic(1_000).with_seed(9);
    let records = simulate_batch_with_recording(StrategyKind::Cycle, &config).unwrap();
    let summary = summarize_records(StrategyKind::Cycle, &config, &records);
    assert_eq!(summary, run_simulation(StrategyKind::Cycle, &config).unwrap());

    let summary_path = dir.path().join("cycle").join("summary.json");
    let counts_path = dir.path().join("cycle").join("successes.bin");
    save_summary(&summary, &summary_path).unwrap();
    save_success_counts(&records, StrategyKind::Cycle, &config, &counts_path).unwrap();

    assert_eq!(load_summary(&summary_path).unwrap(), summary);

    let (header, counts) = load_success_counts(&counts_path).unwrap();
    assert_eq!(header.strategy, StrategyKind::Cycle);
    assert_eq!(header.config(), config);
    let mut rebuilt = vec![0u64; 101];
    for &c in &counts {
        rebuilt[c as usize] += 1;
    }
    assert_eq!(rebuilt, summary.success_counts);
}
