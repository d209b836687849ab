//! The shuffle run: list a folder, interleave it, copy the result.
//!
//! Only the listing, copying and report writing happen here. Ordering is
//! decided by [`crate::interleave`] and naming by [`crate::plan`].

use crate::interleave::{InterleaveOptions, interleave};
use crate::media::{list_audio_files, probe_durations};
use crate::plan::{NamingOptions, ShufflePlan, build_plan};
use crate::report::write_report;
use crate::tools::Tool;
use crate::utils::progress::create_progress_bar;
use crate::utils::validation::{validate_dir_exists, validate_distinct_output};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RandomizeOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Report file; `None` skips writing one.
    pub report: Option<PathBuf>,
    pub naming: NamingOptions,
    /// Move files instead of copying them.
    pub remove_source: bool,
    pub interleave: InterleaveOptions,
    pub ffprobe: Tool,
    /// Compute and report the plan without touching `output`. A report path
    /// inside `output` is refused in this mode.
    pub dry_run: bool,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RandomizeSummary {
    /// `None` when the input folder had no audio files.
    pub plan: Option<ShufflePlan>,
    pub copied: usize,
}

/// Run a shuffle as described by `options`.
///
/// A missing input folder fails before anything is written.
pub fn randomize(options: &RandomizeOptions) -> Result<RandomizeSummary, Box<dyn Error>> {
    log::info!("Starting shuffle of {}", options.input.display());

    if let Err(e) = validate_dir_exists(&options.input) {
        log::error!("Music folder {} not found", options.input.display());
        return Err(e);
    }

    if options.dry_run
        && let Some(report) = &options.report
        && report.starts_with(&options.output)
    {
        return Err(format!(
            "A dry run leaves {} alone, write the report elsewhere",
            options.output.display()
        )
        .into());
    }

    let sources = list_audio_files(&options.input)?;
    if sources.is_empty() {
        if let Some(report) = &options.report {
            write_report(report, None)?;
        }
        log::warn!(
            "Music folder {} is empty, nothing to shuffle",
            options.input.display()
        );
        return Ok(RandomizeSummary {
            plan: None,
            copied: 0,
        });
    }

    if !options.dry_run {
        prepare_output(options)?;
    }

    let arrangement = interleave(&sources, &options.interleave);
    log::info!(
        "Interleaved {} files: {} adjacent collisions, quality {:.1}% (group size {}/{})",
        sources.len(),
        arrangement.collisions,
        arrangement.quality,
        arrangement.group_size,
        arrangement.max_group_size
    );

    let durations = probe_durations(&options.input, &sources, &options.ffprobe);
    let plan = build_plan(&sources, &durations, &arrangement, options.naming);
    if let Some(report) = &options.report {
        write_report(report, Some(&plan))?;
    }

    let copied = if options.dry_run {
        0
    } else {
        transfer(options, &plan)?
    };

    log::info!("Shuffle finished");
    Ok(RandomizeSummary {
        plan: Some(plan),
        copied,
    })
}

fn prepare_output(options: &RandomizeOptions) -> Result<(), Box<dyn Error>> {
    validate_distinct_output(&options.input, &options.output)?;

    if options.output.exists() {
        fs::remove_dir_all(&options.output)?;
        log::info!(
            "Removed existing output folder {}",
            options.output.display()
        );
    }
    fs::create_dir_all(&options.output)?;
    Ok(())
}

fn transfer(options: &RandomizeOptions, plan: &ShufflePlan) -> Result<usize, Box<dyn Error>> {
    let pb = create_progress_bar(plan.entries.len() as u64, !options.show_progress);

    for entry in &plan.entries {
        let from = options.input.join(&entry.source);
        let to = options.output.join(&entry.destination);
        pb.set_message(entry.destination.clone());

        fs::copy(&from, &to).map_err(|e| {
            format!("Failed to copy {} -> {}: {e}", from.display(), to.display())
        })?;
        log::info!("Shuffled: {} -> {}", from.display(), to.display());

        if options.remove_source {
            fs::remove_file(&from)?;
            log::info!("Removed source file: {}", from.display());
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(plan.entries.len())
}
