//! External programs the pipeline shells out to.
//!
//! Encoding, trimming and gain are delegated to `ffmpeg` and `mp3gain`;
//! `ffprobe` reports durations for formats read natively. Argument lists are
//! built separately from execution so they can be checked without the tools
//! installed.

use std::error::Error;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Loudness `mp3gain` treats as unchanged; `-d` is relative to it.
pub const MP3GAIN_REFERENCE_DB: i32 = 89;

/// The program could not be launched because it does not exist.
#[derive(Debug)]
pub struct MissingTool(pub PathBuf);

impl fmt::Display for MissingTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not found", self.0.display())
    }
}

impl Error for MissingTool {}

#[derive(Debug, Clone)]
pub struct Tool {
    pub program: PathBuf,
}

impl Tool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Whether the program can be launched at all.
    pub fn exists(&self) -> bool {
        match Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(_) => true,
            Err(e) => e.kind() != ErrorKind::NotFound,
        }
    }

    /// Run to completion, failing with the tool's stderr on a non-zero exit.
    pub fn run(&self, args: &[OsString]) -> Result<String, Box<dyn Error>> {
        log::debug!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| -> Box<dyn Error> {
                if e.kind() == ErrorKind::NotFound {
                    Box::new(MissingTool(self.program.clone()))
                } else {
                    format!("Failed to launch {}: {e}", self.program.display()).into()
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "{} exited with {}: {}",
                self.name(),
                output.status,
                stderr.trim()
            )
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Whether a failure from [`Tool::run`] means the program is missing, in
/// which case the rest of a batch should stop.
pub fn is_missing_tool(error: &(dyn Error + 'static)) -> bool {
    error.is::<MissingTool>()
}

fn os(value: impl AsRef<OsStr>) -> OsString {
    value.as_ref().to_os_string()
}

/// Re-encode `input` as MP3 at `bitrate`, overwriting `output`.
pub fn ffmpeg_convert_args(input: &Path, output: &Path, bitrate: &str) -> Vec<OsString> {
    vec![
        os("-i"),
        os(input),
        os("-b:a"),
        os(bitrate),
        os(output),
        os("-y"),
    ]
}

/// Copy `start..end` seconds of `input` without re-encoding.
pub fn ffmpeg_trim_args(input: &Path, output: &Path, start: f64, end: f64) -> Vec<OsString> {
    vec![
        os("-i"),
        os(input),
        os("-vn"),
        os("-acodec"),
        os("copy"),
        os("-ss"),
        os(start.to_string()),
        os("-to"),
        os(end.to_string()),
        os(output),
        os("-y"),
    ]
}

/// Adjust `file` in place to `target_db`.
pub fn mp3gain_args(file: &Path, target_db: i32) -> Vec<OsString> {
    vec![
        os("-d"),
        os((target_db - MP3GAIN_REFERENCE_DB).to_string()),
        os("-c"),
        os("-r"),
        os(file),
    ]
}

pub fn ffprobe_duration_args(file: &Path) -> Vec<OsString> {
    vec![
        os("-v"),
        os("error"),
        os("-show_entries"),
        os("format=duration"),
        os("-of"),
        os("default=nk=1:nw=1"),
        os(file),
    ]
}
