//! Audio files on disk: listing a folder and measuring track lengths.

use crate::constants::AUDIO_EXTENSIONS;
use crate::tools::{MissingTool, Tool};
use rayon::prelude::*;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;

/// Check if a file or directory is hidden (starts with '.')
pub fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Whether `path` has one of `extensions` (case-insensitive, no leading dot).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

pub fn is_audio_file(path: &Path) -> bool {
    has_extension(path, AUDIO_EXTENSIONS)
}

/// Names of the visible files in `dir` with one of `extensions`, sorted.
///
/// Only the top level is listed; subfolders are ignored.
pub fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<String>, Box<dyn Error>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Cannot read folder {}: {e}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if is_hidden_file(&path) || !path.is_file() || !has_extension(&path, extensions) {
            continue;
        }
        if let Some(name) = path.file_name() {
            names.push(name.to_string_lossy().to_string());
        }
    }

    names.sort();
    Ok(names)
}

/// Audio files in `dir`, sorted by name.
pub fn list_audio_files(dir: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    list_files(dir, AUDIO_EXTENSIONS)
}

/// Outcome of measuring one file.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    Seconds(f64),
    /// The fallback prober could not be launched at all.
    MissingTool(PathBuf),
    Failed(String),
}

/// Measure `names` inside `dir` in parallel, index for index.
pub fn probe_all(dir: &Path, names: &[String], ffprobe: &Tool) -> Vec<Probe> {
    names
        .par_iter()
        .map(|name| match metadata::probe_duration(&dir.join(name), ffprobe) {
            Ok(seconds) => Probe::Seconds(seconds),
            Err(e) => match e.downcast_ref::<MissingTool>() {
                Some(missing) => Probe::MissingTool(missing.0.clone()),
                None => Probe::Failed(e.to_string()),
            },
        })
        .collect()
}

/// Durations of `names` inside `dir`, index for index.
///
/// A file that cannot be measured is logged and reported as 0 seconds so it
/// still takes part in the run.
pub fn probe_durations(dir: &Path, names: &[String], ffprobe: &Tool) -> Vec<f64> {
    probe_all(dir, names, ffprobe)
        .into_iter()
        .zip(names)
        .map(|(probe, name)| match probe {
            Probe::Seconds(seconds) => seconds,
            Probe::MissingTool(program) => {
                log::warn!(
                    "Could not read duration of {name}: {} not found",
                    program.display()
                );
                0.0
            }
            Probe::Failed(reason) => {
                log::warn!("Could not read duration of {name}: {reason}");
                0.0
            }
        })
        .collect()
}
