//! Plain-text statistics report written next to a shuffle run.

use crate::plan::{ShufflePlan, average_seconds, total_seconds};
use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const STATS_HEADING: &str = "[Label Statistics]";
const STATS_COLUMNS: &str = "label: count - total - average";
const RESULT_HEADING: &str = "[Shuffle Result]";

fn whole_seconds(seconds: f64) -> u64 {
    if seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    }
}

/// `HH:MM:SS`; hours are not capped.
pub fn format_total(seconds: f64) -> String {
    let secs = whole_seconds(seconds);
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}

/// `MM:SS`; minutes are not capped.
pub fn format_average(seconds: f64) -> String {
    let secs = whole_seconds(seconds);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn header() -> String {
    format!(
        "mp3shuffle report - {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )
}

/// Report body for a completed run.
pub fn render(plan: &ShufflePlan) -> String {
    let mut out = header();
    out.push_str(STATS_HEADING);
    out.push('\n');
    out.push_str(STATS_COLUMNS);
    out.push('\n');

    // Writing to a String cannot fail
    let _ = writeln!(
        out,
        "total: {} - {} - {}",
        plan.total,
        format_total(total_seconds(&plan.all_durations)),
        format_average(average_seconds(&plan.all_durations))
    );
    for stats in &plan.labels {
        let _ = writeln!(
            out,
            "{}: {} - {} - {}",
            stats.label,
            stats.count,
            format_total(stats.total_seconds()),
            format_average(stats.average_seconds())
        );
    }

    out.push_str(RESULT_HEADING);
    out.push('\n');
    let _ = writeln!(out, "  adjacent collisions: {}", plan.collisions);
    let _ = writeln!(out, "  quality: {:.1}%", plan.quality);
    for entry in &plan.entries {
        let _ = writeln!(out, "{} {}", entry.id, entry.source);
    }

    out
}

/// Report body for an empty source folder.
pub fn render_empty() -> String {
    let mut out = header();
    let _ = writeln!(out, "{STATS_HEADING}\n{STATS_COLUMNS}");
    let _ = writeln!(
        out,
        "total: 0 - {} - {}",
        format_total(0.0),
        format_average(0.0)
    );
    let _ = writeln!(out, "{RESULT_HEADING}");
    out.push_str("  adjacent collisions: -\n  quality: -%\n");
    out
}

/// Write the report for `plan`, or the empty report when there is none.
pub fn write_report(path: &Path, plan: Option<&ShufflePlan>) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let body = match plan {
        Some(plan) => render(plan),
        None => render_empty(),
    };
    fs::write(path, body)
        .map_err(|e| format!("Failed to write report {}: {e}", path.display()))?;
    log::info!("Wrote report: {}", path.display());
    Ok(())
}
