//! Rendering of a [`RunSummary`]: plain text for terminals, SVG bar charts.
//!
//! The simulation core never prints; binaries call these and decide where the
//! output goes. Runs of empty histogram bins collapse into one line, which keeps
//! the cycle strategy's structural gap (no success counts in
//! `max_opens + 1 ..= N - 1`) visible at a glance.

use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

use plotters::prelude::*;

use crate::simulation::statistics::RunSummary;

/// Default bar width in characters.
pub const DEFAULT_BAR_WIDTH: usize = 50;

/// Format a `u64` with comma separators.
pub fn fmt_num(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// `Win % = wins/trials = p`
pub fn win_line(summary: &RunSummary) -> String {
    format!(
        "Win % = {}/{} = {:.6}",
        summary.wins, summary.trials, summary.win_probability
    )
}

/// Headline numbers, one per line.
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Strategy: {} ({} prisoners, {} opens each, seed {})",
        summary.strategy, summary.prisoners, summary.max_opens, summary.seed
    );
    let _ = writeln!(out, "  Trials:           {:>12}", fmt_num(summary.trials));
    let _ = writeln!(out, "  Wins:             {:>12}", fmt_num(summary.wins));
    let _ = writeln!(
        out,
        "  Win probability:  {:>12.6}  (± {:.6})",
        summary.win_probability, summary.standard_error
    );
    let _ = writeln!(
        out,
        "  Mean successes:   {:>12.3}  (sd {:.3})",
        summary.mean_successes, summary.std_dev_successes
    );
    let _ = writeln!(
        out,
        "  Per-prisoner:     {:>12.6}",
        summary.per_prisoner_success_rate
    );
    let _ = writeln!(out, "  Mean boxes/turn:  {:>12.3}", summary.mean_boxes_opened);
    out
}

fn bar_len(freq: f64, max_freq: f64, min_freq: f64, width: usize, log_scale: bool) -> usize {
    if width == 0 || freq <= 0.0 || max_freq <= 0.0 {
        return 0;
    }
    let frac = if log_scale {
        // Map [min_freq, max_freq] onto (0, 1] logarithmically.
        let lo = min_freq.ln();
        let hi = max_freq.ln();
        if hi - lo < f64::EPSILON {
            1.0
        } else {
            (freq.ln() - lo) / (hi - lo)
        }
    } else {
        freq / max_freq
    };
    ((frac * width as f64).round() as usize).clamp(1, width)
}

/// Bar chart of the success-count histogram.
pub fn render_histogram(summary: &RunSummary, width: usize, log_scale: bool) -> String {
    let freqs = summary.histogram_vec();
    let max_freq = freqs.iter().copied().fold(0.0f64, f64::max);
    let min_freq = freqs
        .iter()
        .copied()
        .filter(|&f| f > 0.0)
        .fold(f64::INFINITY, f64::min);
    let label_width = summary.prisoners.to_string().len();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Prisoners succeeded per trial ({} scale):",
        if log_scale { "log" } else { "linear" }
    );

    let mut k = 0;
    while k < freqs.len() {
        if freqs[k] == 0.0 {
            let start = k;
            while k < freqs.len() && freqs[k] == 0.0 {
                k += 1;
            }
            let end = k - 1;
            let label = if start == end {
                format!("{:>w$}", start, w = label_width)
            } else {
                format!("{:>w$}-{:<w$}", start, end, w = label_width)
            };
            let _ = writeln!(out, "  {:>lw$} | (none)", label, lw = label_width * 2 + 1);
            continue;
        }
        let bar = "#".repeat(bar_len(freqs[k], max_freq, min_freq, width, log_scale));
        let _ = writeln!(
            out,
            "  {:>lw$} | {:<width$} {:.6}",
            k,
            bar,
            freqs[k],
            lw = label_width * 2 + 1,
            width = width
        );
        k += 1;
    }
    out
}

/// Pixel size of [`plot_histogram_svg`] charts.
pub const PLOT_SIZE: (u32, u32) = (1200, 700);

/// Draw the success-count histogram as an SVG bar chart at `path`.
///
/// Parent directories are created. On a log scale empty bins are left out.
pub fn plot_histogram_svg(
    summary: &RunSummary,
    path: &Path,
    log_scale: bool,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let freqs = summary.histogram_vec();
    let max_freq = freqs.iter().copied().fold(0.0f64, f64::max);
    if max_freq <= 0.0 {
        return Err("histogram has no mass to plot".into());
    }
    let x_range = -0.5f64..freqs.len() as f64 - 0.5;

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(
            format!(
                "{} strategy: {} prisoners, {} opens, {} trials",
                summary.strategy, summary.prisoners, summary.max_opens, summary.trials
            ),
            ("sans-serif", 22),
        )
        .margin(14)
        .x_label_area_size(44)
        .y_label_area_size(80);

    if log_scale {
        let min_freq = freqs
            .iter()
            .copied()
            .filter(|&f| f > 0.0)
            .fold(f64::INFINITY, f64::min);
        let floor = min_freq / 2.0;
        let mut chart =
            builder.build_cartesian_2d(x_range, (floor..max_freq * 2.0).log_scale())?;
        chart
            .configure_mesh()
            .x_desc("prisoners succeeded")
            .y_desc("fraction of trials (log)")
            .draw()?;
        chart.draw_series(bars(&freqs, floor))?;
    } else {
        let mut chart = builder.build_cartesian_2d(x_range, 0.0..max_freq * 1.1)?;
        chart
            .configure_mesh()
            .x_desc("prisoners succeeded")
            .y_desc("fraction of trials")
            .draw()?;
        chart.draw_series(bars(&freqs, 0.0))?;
    }

    root.present()?;
    Ok(())
}

fn bars(freqs: &[f64], base: f64) -> impl Iterator<Item = Rectangle<(f64, f64)>> + '_ {
    freqs
        .iter()
        .enumerate()
        .filter(|&(_, &f)| f > 0.0)
        .map(move |(k, &f)| {
            let x = k as f64;
            Rectangle::new([(x - 0.4, base), (x + 0.4, f)], BLUE.mix(0.6).filled())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::engine::TrialResult;
    use crate::simulation::statistics::TrialTally;

    fn summary(counts: &[usize], n: usize) -> RunSummary {
        let mut t = TrialTally::new(n);
        for &successes in counts {
            t.record(&TrialResult {
                successes,
                all_succeeded: successes == n,
                boxes_opened: 0,
                longest_cycle: 1,
            });
        }
        t.finish("cycle", n / 2, 42)
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(0), "0");
        assert_eq!(fmt_num(999), "999");
        assert_eq!(fmt_num(1000), "1,000");
        assert_eq!(fmt_num(100_000), "100,000");
        assert_eq!(fmt_num(1_234_567), "1,234,567");
    }

    #[test]
    fn test_win_line() {
        let s = summary(&[4, 4, 1, 0], 4);
        assert_eq!(win_line(&s), "Win % = 2/4 = 0.500000");
    }

    #[test]
    fn test_render_summary_mentions_strategy() {
        let text = render_summary(&summary(&[4, 1], 4));
        assert!(text.starts_with("Strategy: cycle (4 prisoners, 2 opens each, seed 42)"));
        assert!(text.contains("Wins:"));
    }

    #[test]
    fn test_histogram_collapses_empty_runs() {
        // counts 0 and 10 only; 1..=9 empty
        let s = summary(&[0, 10, 10, 10], 10);
        let text = render_histogram(&s, 20, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4, "{text}");
        assert!(lines[2].contains(" 1-9 "), "{text}");
        assert!(lines[2].ends_with("(none)"));
        assert!(lines[3].contains(&"#".repeat(20)));
    }

    #[test]
    fn test_log_scale_keeps_small_bins_visible() {
        let mut counts = vec![5usize; 1];
        counts.extend(std::iter::repeat(10).take(999));
        let s = summary(&counts, 10);
        let text = render_histogram(&s, 30, true);
        let row5 = text.lines().find(|l| l.trim_start().starts_with("5 |")).unwrap();
        assert!(row5.contains('#'), "{text}");
    }

    #[test]
    fn test_bar_len_bounds() {
        assert_eq!(bar_len(0.0, 1.0, 0.1, 10, false), 0);
        assert_eq!(bar_len(1.0, 1.0, 0.1, 10, false), 10);
        assert_eq!(bar_len(0.001, 1.0, 0.001, 10, false), 1);
        assert_eq!(bar_len(0.5, 0.5, 0.5, 10, true), 10);
        assert_eq!(bar_len(1.0, 1.0, 0.1, 0, false), 0);
        assert_eq!(bar_len(1.0, 1.0, 0.1, 0, true), 0);
    }

    #[test]
    fn test_histogram_zero_width_has_no_bars() {
        let s = summary(&[0, 2, 2, 1], 2);
        for log_scale in [false, true] {
            let text = render_histogram(&s, 0, log_scale);
            assert_eq!(text.lines().count(), 4, "{text}");
            assert!(!text.contains('#'), "{text}");
        }
    }

    #[test]
    fn test_plot_histogram_svg_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let s = summary(&[0, 10, 10, 3, 10], 10);
        for (log_scale, name) in [(false, "linear.svg"), (true, "plots/log.svg")] {
            let path = dir.path().join(name);
            plot_histogram_svg(&s, &path, log_scale).unwrap();
            let svg = std::fs::read_to_string(&path).unwrap();
            assert!(svg.contains("<svg"), "{name}");
            assert!(svg.contains("<rect"), "{name}");
        }
    }
}
