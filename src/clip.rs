//! Clip markers embedded in file names.
//!
//! A track can ask to be trimmed by carrying `(start-end)` right before its
//! extension, in ASCII or full-width parentheses:
//!
//! | marker      | meaning                                  |
//! |-------------|------------------------------------------|
//! | `(5.2-)`    | drop the first 5.2 seconds               |
//! | `(--6)`     | drop the last 6 seconds                  |
//! | `(-40--2)`  | keep from 40 s before the end to 2 s before the end |
//! | `(---)`     | no bounds: only strip the marker from the name |
//!
//! A negative bound counts from the end of the track. Bounds that are not
//! numbers are ignored. The marker is removed from the resulting file name.

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

const MARKER_PATTERN: &str = r"^(.*)[(（](-??[^-]*?)-(-??[^-]*?)[)）](.*)\..*";

/// Suffix appended to a clipped name until it no longer collides.
const DUPLICATE_SUFFIX: &str = "_2";

#[derive(Debug, Clone, PartialEq)]
pub struct ClipMarker {
    /// Name with the marker and extension removed.
    pub stem: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClipAction {
    /// Marker without bounds: only the name changes.
    Rename { source: String, target: String },
    /// Keep `start..end` seconds of `source` as `target`.
    Trim {
        source: String,
        target: String,
        start: f64,
        end: f64,
    },
}

impl ClipAction {
    pub fn source(&self) -> &str {
        match self {
            ClipAction::Rename { source, .. } | ClipAction::Trim { source, .. } => source,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            ClipAction::Rename { target, .. } | ClipAction::Trim { target, .. } => target,
        }
    }
}

fn parse_bound(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Resolve marker bounds against a track of `length` seconds.
///
/// Returns `None` when the window is empty or falls outside the track.
pub fn resolve_window(start: Option<f64>, end: Option<f64>, length: f64) -> Option<(f64, f64)> {
    // A zero bound behaves like a missing one
    let mut start = match start {
        Some(s) if s < 0.0 => length + s,
        Some(s) if s != 0.0 => s,
        _ => 0.0,
    };
    let mut end = match end {
        Some(e) if e < 0.0 => length + e,
        Some(e) if e != 0.0 => e,
        _ => length,
    };

    if start > end {
        std::mem::swap(&mut start, &mut end);
    }
    start = start.max(0.0);
    end = end.min(length);

    if start == end || start >= length || end <= 0.0 {
        None
    } else {
        Some((start, end))
    }
}

pub struct ClipPlanner {
    marker: Regex,
}

impl ClipPlanner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            marker: Regex::new(MARKER_PATTERN)?,
        })
    }

    /// Parse the clip marker of `file_name`, if it has one.
    pub fn parse_marker(&self, file_name: &str) -> Option<ClipMarker> {
        let caps = self.marker.captures(file_name)?;
        let part = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        Some(ClipMarker {
            stem: format!("{}{}", part(1), part(4)),
            start: parse_bound(part(2)),
            end: parse_bound(part(3)),
        })
    }

    /// Work out what to do with each `(file name, length in seconds)`.
    ///
    /// Files without a marker, or whose window is empty, get no action.
    /// Target names end in `.mp3` and never repeat each other or the stem
    /// of an unmarked file in the same batch.
    pub fn plan_clips(&self, files: &[(String, f64)]) -> Vec<ClipAction> {
        let markers: Vec<Option<ClipMarker>> =
            files.iter().map(|(name, _)| self.parse_marker(name)).collect();

        let mut used: HashSet<String> = HashSet::from([String::new()]);
        for ((name, _), marker) in files.iter().zip(&markers) {
            if marker.is_none()
                && let Some(stem) = Path::new(name).file_stem()
            {
                used.insert(stem.to_string_lossy().to_string());
            }
        }

        let mut actions = Vec::new();
        for ((source, length), marker) in files.iter().zip(markers) {
            let Some(marker) = marker else {
                continue;
            };

            let mut stem = marker.stem;
            while used.contains(&stem) {
                stem.push_str(DUPLICATE_SUFFIX);
            }
            used.insert(stem.clone());
            let target = format!("{stem}.mp3");

            if marker.start.is_none() && marker.end.is_none() {
                actions.push(ClipAction::Rename {
                    source: source.clone(),
                    target,
                });
                continue;
            }

            if let Some((start, end)) = resolve_window(marker.start, marker.end, *length) {
                actions.push(ClipAction::Trim {
                    source: source.clone(),
                    target,
                    start,
                    end,
                });
            }
        }

        actions
    }
}
