//! Project-wide constants used across multiple modules.

/// Spinner animation characters for progress indicators
pub const SPINNER_CHARS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Audio formats picked up from a source folder
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "aiff", "aif", "m4a", "aac", "ogg", "opus", "wma",
];

/// Only MP3 files take part in clipping and gain adjustment
pub const MP3_EXTENSIONS: &[&str] = &["mp3"];

/// Encoder bitrate used when normalizing to MP3
pub const DEFAULT_BITRATE: &str = "128k";

/// Report file written by `shuffle` when no path is given
pub const DEFAULT_REPORT_NAME: &str = "shuffle_report.txt";
