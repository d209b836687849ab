use super::BatchOutcome;
use mp3_shuffle::clip::{ClipAction, ClipPlanner};
use mp3_shuffle::config::{Config, expand};
use mp3_shuffle::constants::MP3_EXTENSIONS;
use mp3_shuffle::media::{Probe, list_files, probe_all};
use mp3_shuffle::tools::{Tool, ffmpeg_trim_args, is_missing_tool};
use mp3_shuffle::utils::progress::{create_progress_bar, create_progress_spinner};
use mp3_shuffle::utils::validation::validate_dir_exists;
use owo_colors::OwoColorize;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub fn handle_clip(dir: &str, output: Option<&str>, remove: bool) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let dir = expand(dir);
    let output = output.map(expand).unwrap_or_else(|| dir.clone());

    println!("{} {}", "Clipping".cyan().bold(), dir.display());
    let outcome = clip_folder(
        &dir,
        &output,
        &config.ffmpeg(),
        &config.ffprobe(),
        remove,
        true,
    )?;
    outcome.print("Clipped");

    Ok(())
}

/// Apply the clip markers found in the MP3 names of `dir`, writing results
/// to `output`.
///
/// A target that already exists is never overwritten. A missing prober or
/// encoder stops the batch with an error.
pub fn clip_folder(
    dir: &Path,
    output: &Path,
    ffmpeg: &Tool,
    ffprobe: &Tool,
    remove: bool,
    show_progress: bool,
) -> Result<BatchOutcome, Box<dyn Error>> {
    validate_dir_exists(dir)?;
    fs::create_dir_all(output)?;

    let planner = ClipPlanner::new()?;
    let (files, unreadable) = measure_marked(dir, &planner, ffprobe, show_progress)?;

    let mut outcome = apply_clips(&planner, dir, output, &files, ffmpeg, remove, show_progress)?;
    outcome.failed += unreadable;
    Ok(outcome)
}

/// Pair every MP3 in `dir` with the length its clip window needs.
///
/// Only markers with a bound are measured; unmarked files and bare markers
/// get 0 seconds. Returns the pairs in listing order and the number of
/// files that could not be measured, which are left out.
fn measure_marked(
    dir: &Path,
    planner: &ClipPlanner,
    ffprobe: &Tool,
    show_progress: bool,
) -> Result<(Vec<(String, f64)>, usize), Box<dyn Error>> {
    let mut files = Vec::new();
    let mut bounded = Vec::new();
    for name in list_files(dir, MP3_EXTENSIONS)? {
        match planner.parse_marker(&name) {
            Some(marker) if marker.start.is_some() || marker.end.is_some() => bounded.push(name),
            _ => files.push((name, 0.0)),
        }
    }

    let spinner = create_progress_spinner(!show_progress);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Measuring {} marked file(s)...", bounded.len()));
    let probes = probe_all(dir, &bounded, ffprobe);
    spinner.finish_and_clear();

    let mut unreadable = 0;
    for (name, probe) in bounded.into_iter().zip(probes) {
        match probe {
            Probe::Seconds(seconds) => files.push((name, seconds)),
            Probe::MissingTool(program) => {
                log::error!("{} not found, stopping clipping", program.display());
                return Err(format!(
                    "{} {} not found. Set its path with 'mp3shuffle config set ffprobe_path <path>'",
                    "Error:".red().bold(),
                    program.display()
                )
                .into());
            }
            Probe::Failed(reason) => {
                log::error!("Could not read duration of {name}: {reason}");
                unreadable += 1;
            }
        }
    }

    // Duplicate targets are numbered in listing order
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok((files, unreadable))
}

/// Rename or trim the `(name, length)` pairs of `dir` into `output`.
///
/// Marked files whose window turns out empty count as skipped.
fn apply_clips(
    planner: &ClipPlanner,
    dir: &Path,
    output: &Path,
    files: &[(String, f64)],
    ffmpeg: &Tool,
    remove: bool,
    show_progress: bool,
) -> Result<BatchOutcome, Box<dyn Error>> {
    let actions = planner.plan_clips(files);
    let mut outcome = BatchOutcome::default();
    for (name, _) in files {
        if planner.parse_marker(name).is_some() && !actions.iter().any(|a| a.source() == name) {
            log::warn!("Clip window of {name} is empty, leaving it untouched");
            outcome.skipped += 1;
        }
    }

    let pb = create_progress_bar(actions.len() as u64, !show_progress);

    for action in &actions {
        pb.set_message(action.source().to_string());
        let source = dir.join(action.source());
        let target = output.join(action.target());

        if target.exists() {
            log::warn!("{} already exists, skipping", target.display());
            outcome.skipped += 1;
            pb.inc(1);
            continue;
        }

        let applied = match action {
            ClipAction::Rename { .. } => fs::copy(&source, &target)
                .map(|_| ())
                .map_err(|e| -> Box<dyn Error> { e.into() }),
            ClipAction::Trim { start, end, .. } => ffmpeg
                .run(&ffmpeg_trim_args(&source, &target, *start, *end))
                .map(|_| ()),
        };

        match applied {
            Ok(()) => {
                log::info!("Clipped: {} -> {}", source.display(), target.display());
                outcome.processed += 1;
                if remove {
                    fs::remove_file(&source)?;
                    log::info!("Removed source file: {}", source.display());
                }
            }
            Err(e) if is_missing_tool(&*e) => {
                pb.finish_and_clear();
                log::error!("{e}, stopping clipping");
                return Err(format!(
                    "{} {e}. Set its path with 'mp3shuffle config set ffmpeg_path <path>'",
                    "Error:".red().bold()
                )
                .into());
            }
            Err(e) => {
                log::error!("Failed to clip {}: {e}", source.display());
                outcome.failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(outcome)
}
