use mp3_shuffle::config::{Config, SETTABLE_KEYS};
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::Command;

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    println!("Current mp3shuffle configuration:");
    println!("  ffmpeg_path: {}", config.ffmpeg_path);
    println!("  ffprobe_path: {}", config.ffprobe_path);
    println!("  mp3gain_path: {}", config.mp3gain_path);
    println!("  bitrate: {}", config.bitrate);
    println!("  target_db: {}", config.target_db);
    println!("  trials_per_size: {}", config.trials_per_size);
    println!("  group_ratio: {}", config.group_ratio);
    println!("  label_in_name: {}", config.label_in_name);
    println!("  name_in_name: {}", config.name_in_name);
    println!("  remove_source: {}", config.remove_source);
    println!("  log_file: {}", config.log_path()?.display());

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    println!("Configuration updated: {key} = {value}");

    Ok(())
}

pub fn handle_config_edit() -> Result<(), Box<dyn Error>> {
    if !Config::exists()? {
        return Err("mp3shuffle not initialized. Run 'mp3shuffle init' first.".into());
    }

    let config_path = Config::config_path()?;
    let previous = fs::read_to_string(&config_path)?;
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    println!("Opening {} in {}", config_path.display(), editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!("Editor '{editor}' not found. Set $EDITOR to a valid editor path.")
            } else {
                format!("Failed to launch editor '{editor}': {e}")
            }
        })?;

    if !status.success() {
        return Err(format!("Editor '{editor}' exited with error").into());
    }

    check_edit(&config_path, &previous)?;
    println!("Configuration saved successfully");

    Ok(())
}

/// Keep an edited config file only if it still loads; otherwise put
/// `previous` back so later commands keep working.
fn check_edit(config_path: &Path, previous: &str) -> Result<(), Box<dyn Error>> {
    let edited = fs::read_to_string(config_path)?;
    if let Err(e) = Config::from_toml(&edited) {
        fs::write(config_path, previous)?;
        log::warn!("Rejected edit of {}: {e}", config_path.display());
        return Err(format!(
            "Configuration validation failed: {e}\nKnown keys: {}\nThe previous configuration was restored.",
            SETTABLE_KEYS.join(", ")
        )
        .into());
    }
    Ok(())
}
