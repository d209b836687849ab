//! Application configuration management.
//!
//! This module holds the persistent settings for mp3shuffle: where the
//! external encoders live, the loudness target, how the interleaving search
//! is tuned, and how shuffled files are named. Configuration is stored in the
//! user's config directory (typically ~/.config/mp3shuffle/config.toml); a
//! missing file means defaults.

use crate::constants::DEFAULT_BITRATE;
use crate::interleave::{DEFAULT_GROUP_RATIO, DEFAULT_TRIALS_PER_SIZE, InterleaveOptions};
use crate::plan::NamingOptions;
use crate::tools::{MP3GAIN_REFERENCE_DB, Tool};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

/// Keys accepted by `config set`.
pub const SETTABLE_KEYS: &[&str] = &[
    "ffmpeg_path",
    "ffprobe_path",
    "mp3gain_path",
    "bitrate",
    "target_db",
    "trials_per_size",
    "group_ratio",
    "label_in_name",
    "name_in_name",
    "remove_source",
    "log_file",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,
    #[serde(default = "default_mp3gain_path")]
    pub mp3gain_path: String,
    #[serde(default = "default_bitrate")]
    pub bitrate: String,
    #[serde(default = "default_target_db")]
    pub target_db: i32,
    #[serde(default = "default_trials_per_size")]
    pub trials_per_size: usize,
    #[serde(default = "default_group_ratio")]
    pub group_ratio: f64,
    #[serde(default)]
    pub label_in_name: bool,
    #[serde(default)]
    pub name_in_name: bool,
    #[serde(default)]
    pub remove_source: bool,
    /// Log file; `mp3shuffle.log` in the config directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_mp3gain_path() -> String {
    "mp3gain".to_string()
}

fn default_bitrate() -> String {
    DEFAULT_BITRATE.to_string()
}

fn default_target_db() -> i32 {
    MP3GAIN_REFERENCE_DB
}

fn default_trials_per_size() -> usize {
    DEFAULT_TRIALS_PER_SIZE
}

fn default_group_ratio() -> f64 {
    DEFAULT_GROUP_RATIO
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            mp3gain_path: default_mp3gain_path(),
            bitrate: default_bitrate(),
            target_db: default_target_db(),
            trials_per_size: default_trials_per_size(),
            group_ratio: default_group_ratio(),
            label_in_name: false,
            name_in_name: false,
            remove_source: false,
            log_file: None,
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("mp3shuffle")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("mp3shuffle")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate the contents of a config file.
    pub fn from_toml(contents: &str) -> Result<Self, Box<dyn Error>> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if !(self.group_ratio > 0.0 && self.group_ratio <= 1.0) {
            return Err(format!(
                "group_ratio must be in (0, 1], got {}",
                self.group_ratio
            )
            .into());
        }
        if self.trials_per_size == 0 {
            return Err("trials_per_size must be at least 1".into());
        }
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let parse_bool = |value: &str| {
            value
                .parse::<bool>()
                .map_err(|_| "Value must be 'true' or 'false'")
        };

        let mut updated = self.clone();
        match key {
            "ffmpeg_path" => updated.ffmpeg_path = value.to_string(),
            "ffprobe_path" => updated.ffprobe_path = value.to_string(),
            "mp3gain_path" => updated.mp3gain_path = value.to_string(),
            "bitrate" => updated.bitrate = value.to_string(),
            "target_db" => {
                updated.target_db = value
                    .parse::<i32>()
                    .map_err(|_| "target_db must be a whole number of decibels")?;
            }
            "trials_per_size" => {
                updated.trials_per_size = value
                    .parse::<usize>()
                    .map_err(|_| "trials_per_size must be a positive integer")?;
            }
            "group_ratio" => {
                updated.group_ratio = value
                    .parse::<f64>()
                    .map_err(|_| "group_ratio must be a number")?;
            }
            "label_in_name" => updated.label_in_name = parse_bool(value)?,
            "name_in_name" => updated.name_in_name = parse_bool(value)?,
            "remove_source" => updated.remove_source = parse_bool(value)?,
            "log_file" => {
                updated.log_file = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn ffmpeg(&self) -> Tool {
        Tool::new(expand(&self.ffmpeg_path))
    }

    pub fn ffprobe(&self) -> Tool {
        Tool::new(expand(&self.ffprobe_path))
    }

    pub fn mp3gain(&self) -> Tool {
        Tool::new(expand(&self.mp3gain_path))
    }

    pub fn log_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        match &self.log_file {
            Some(path) => Ok(expand(path)),
            None => Ok(Self::config_dir()?.join("mp3shuffle.log")),
        }
    }

    pub fn interleave_options(&self, seed: Option<u64>) -> InterleaveOptions {
        InterleaveOptions {
            trials_per_size: self.trials_per_size,
            group_ratio: self.group_ratio,
            seed,
        }
    }

    pub fn naming(&self) -> NamingOptions {
        NamingOptions {
            with_label: self.label_in_name,
            with_name: self.name_in_name,
        }
    }
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
