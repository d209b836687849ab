//! Destination naming and per-label statistics for a shuffle run.
//!
//! Turns an [`Arrangement`] into the list of copies to perform and the
//! numbers the report needs. Nothing here touches the filesystem.

use crate::interleave::Arrangement;
use crate::label::{display_name, extract_label};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// How destination file names are decorated after the sequence number.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamingOptions {
    /// Append `[label]` after the number.
    pub with_label: bool,
    /// Append the original title after the number (and label).
    pub with_name: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEntry {
    /// Zero-padded sequence number.
    pub id: String,
    pub source: String,
    pub label: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelStats {
    pub label: String,
    pub count: usize,
    pub durations: Vec<f64>,
}

impl LabelStats {
    pub fn total_seconds(&self) -> f64 {
        total_seconds(&self.durations)
    }

    pub fn average_seconds(&self) -> f64 {
        average_seconds(&self.durations)
    }
}

/// Sum of the positive durations.
pub fn total_seconds(durations: &[f64]) -> f64 {
    durations.iter().filter(|&&d| d > 0.0).sum()
}

/// Mean of the positive durations, 0 when there are none.
pub fn average_seconds(durations: &[f64]) -> f64 {
    let positive: Vec<f64> = durations.iter().copied().filter(|&d| d > 0.0).collect();
    if positive.is_empty() {
        0.0
    } else {
        positive.iter().sum::<f64>() / positive.len() as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShufflePlan {
    pub total: usize,
    pub entries: Vec<PlanEntry>,
    pub collisions: usize,
    pub quality: f64,
    /// Ordered by count, then label, both descending.
    pub labels: Vec<LabelStats>,
    pub all_durations: Vec<f64>,
}

/// Digits needed to print `count`.
pub fn id_width(count: usize) -> usize {
    count.to_string().len()
}

/// `1..=count` as zero-padded strings of equal width.
pub fn sequential_ids(count: usize) -> Vec<String> {
    let width = id_width(count);
    (1..=count).map(|i| format!("{i:0width$}")).collect()
}

/// File name for a track placed at `id`.
pub fn destination_name(id: &str, source: &str, label: &str, options: NamingOptions) -> String {
    let mut name = id.to_string();
    if options.with_label {
        name.push('[');
        name.push_str(label);
        name.push(']');
    }
    if options.with_name {
        name.push_str(display_name(source));
    }
    if let Some(ext) = Path::new(source).extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    name
}

/// Build the copy plan and statistics.
///
/// `sources` is the listing in its original order and `durations` holds the
/// length in seconds of each listed file, index for index. Missing durations
/// count as 0.
pub fn build_plan(
    sources: &[String],
    durations: &[f64],
    arrangement: &Arrangement,
    options: NamingOptions,
) -> ShufflePlan {
    let ids = sequential_ids(arrangement.order.len());
    let entries = ids
        .into_iter()
        .zip(&arrangement.order)
        .map(|(id, source)| {
            let label = extract_label(source).to_string();
            let destination = destination_name(&id, source, &label, options);
            PlanEntry {
                id,
                source: source.clone(),
                label,
                destination,
            }
        })
        .collect();

    let all_durations: Vec<f64> = (0..sources.len())
        .map(|i| durations.get(i).copied().unwrap_or(0.0))
        .collect();

    let mut by_label: HashMap<&str, Vec<f64>> = HashMap::new();
    for (source, &duration) in sources.iter().zip(&all_durations) {
        by_label
            .entry(extract_label(source))
            .or_default()
            .push(duration);
    }

    let mut labels: Vec<LabelStats> = by_label
        .into_iter()
        .map(|(label, durations)| LabelStats {
            label: label.to_string(),
            count: durations.len(),
            durations,
        })
        .collect();
    labels.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| b.label.cmp(&a.label)));

    ShufflePlan {
        total: sources.len(),
        entries,
        collisions: arrangement.collisions,
        quality: arrangement.quality,
        labels,
        all_durations,
    }
}
