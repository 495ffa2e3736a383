//! 100 prisoners simulation: random opening versus cycle following.
//!
//! Runs T trials per strategy and prints the win rate plus the distribution of
//! prisoners succeeded per trial. With `--output DIR`, writes per strategy:
//!   - `DIR/<strategy>/summary.json`: full run summary
//!   - `DIR/<strategy>/successes.bin`: per-trial success counts
//!
//! With `--plot FILE.svg`, draws the histogram as an SVG bar chart. When more
//! than one strategy runs, the strategy name is appended to the file stem.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use prisoners::constants::{default_max_opens, DEFAULT_PRISONERS, DEFAULT_SEED, DEFAULT_TRIALS};
use prisoners::report::{
    plot_histogram_svg, render_histogram, render_summary, win_line, DEFAULT_BAR_WIDTH,
};
use prisoners::simulation::{
    binomial_pmf, run_simulation, run_simulation_with_rng, save_success_counts, save_summary,
    simulate_batch_with_recording, simulate_sequence_with_recording, summarize_records,
    total_variation_distance, trial_rng, RunSummary,
};
use prisoners::{SimulationConfig, StrategyKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyChoice {
    Random,
    Cycle,
    Both,
}

impl StrategyChoice {
    fn kinds(self) -> Vec<StrategyKind> {
        match self {
            StrategyChoice::Random => vec![StrategyKind::Random],
            StrategyChoice::Cycle => vec![StrategyKind::Cycle],
            StrategyChoice::Both => StrategyKind::ALL.to_vec(),
        }
    }
}

/// Monte Carlo simulation of the 100 prisoners problem
#[derive(Parser, Debug)]
#[command(name = "prisoners-simulate")]
#[command(about = "Simulate the 100 prisoners problem", long_about = None)]
struct Args {
    /// Strategy to simulate
    #[arg(short, long, value_enum, default_value = "both", env = "PRISONERS_STRATEGY")]
    strategy: StrategyChoice,

    /// Number of prisoners (and boxes)
    #[arg(short = 'n', long, default_value_t = DEFAULT_PRISONERS, env = "PRISONERS_N")]
    prisoners: usize,

    /// Boxes each prisoner may open (default: half the boxes)
    #[arg(short = 'k', long, env = "PRISONERS_MAX_OPENS")]
    max_opens: Option<usize>,

    /// Number of independent trials
    #[arg(short, long, default_value_t = DEFAULT_TRIALS, env = "PRISONERS_TRIALS")]
    trials: usize,

    /// RNG seed
    #[arg(long, default_value_t = DEFAULT_SEED, env = "PRISONERS_SEED")]
    seed: u64,

    /// Run trials one after another from a single RNG instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Draw the histogram on a log scale
    #[arg(long)]
    log_scale: bool,

    /// Save the histogram as an SVG bar chart
    #[arg(long, env = "PRISONERS_PLOT")]
    plot: Option<PathBuf>,

    /// Write summary.json and successes.bin per strategy to DIR
    #[arg(short, long, env = "PRISONERS_OUTPUT")]
    output: Option<PathBuf>,
}

fn run_one(
    kind: StrategyKind,
    config: &SimulationConfig,
    args: &Args,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let Some(dir) = &args.output else {
        if args.sequential {
            let mut rng = trial_rng(config.seed, 0);
            return Ok(run_simulation_with_rng(kind, config, &mut rng)?);
        }
        return Ok(run_simulation(kind, config)?);
    };

    let records = if args.sequential {
        let mut rng = trial_rng(config.seed, 0);
        simulate_sequence_with_recording(kind, config, &mut rng)?
    } else {
        simulate_batch_with_recording(kind, config)?
    };
    let summary = summarize_records(kind, config, &records);
    let strategy_dir = dir.join(kind.name());
    save_summary(&summary, &strategy_dir.join("summary.json"))?;
    save_success_counts(&records, kind, config, &strategy_dir.join("successes.bin"))?;
    println!("  Wrote {}", strategy_dir.display());
    Ok(summary)
}

/// `plot.svg` stays as given for a single strategy, else becomes `plot-<strategy>.svg`.
fn plot_path(path: &Path, kind: StrategyKind, several: bool) -> PathBuf {
    if !several {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, kind.name(), ext.to_string_lossy()),
        None => format!("{}-{}", stem, kind.name()),
    };
    path.with_file_name(name)
}

fn main() -> ExitCode {
    prisoners::env_config::init_tracing();
    let args = Args::parse();

    let config = SimulationConfig {
        prisoners: args.prisoners,
        max_opens: args
            .max_opens
            .unwrap_or_else(|| default_max_opens(args.prisoners)),
        trials: args.trials,
        seed: args.seed,
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let num_threads = prisoners::env_config::init_rayon_threads();
    println!(
        "Prisoners Simulation ({} prisoners, {} opens, {} trials, {} threads)",
        config.prisoners, config.max_opens, config.trials, num_threads
    );

    let kinds = args.strategy.kinds();
    for &kind in &kinds {
        println!();
        let t0 = Instant::now();
        let summary = match run_one(kind, &config, &args) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error running {} strategy: {}", kind, e);
                return ExitCode::FAILURE;
            }
        };
        let elapsed = t0.elapsed().as_secs_f64();

        print!("{}", render_summary(&summary));
        println!("  Elapsed:          {:>12.2}s", elapsed);
        if kind == StrategyKind::Random {
            let p = config.max_opens as f64 / config.prisoners as f64;
            let tvd = total_variation_distance(
                &summary.histogram_vec(),
                &binomial_pmf(config.prisoners, p),
            );
            println!("  TV distance to Binomial(N, {:.3}): {:.6}", p, tvd);
        }
        println!();
        print!(
            "{}",
            render_histogram(&summary, DEFAULT_BAR_WIDTH, args.log_scale)
        );
        println!("{}", win_line(&summary));

        if let Some(plot) = &args.plot {
            let path = plot_path(plot, kind, kinds.len() > 1);
            if let Err(e) = plot_histogram_svg(&summary, &path, args.log_scale) {
                eprintln!("Error plotting {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
            println!("  Plotted {}", path.display());
        }
    }

    ExitCode::SUCCESS
}
