use super::BatchOutcome;
use mp3_shuffle::config::{Config, expand};
use mp3_shuffle::constants::MP3_EXTENSIONS;
use mp3_shuffle::media::list_files;
use mp3_shuffle::tools::{Tool, is_missing_tool, mp3gain_args};
use mp3_shuffle::utils::progress::create_progress_bar;
use mp3_shuffle::utils::validation::validate_dir_exists;
use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;

pub fn handle_gain(dir: &str, db: Option<i32>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let dir = expand(dir);
    let target_db = db.unwrap_or(config.target_db);

    println!(
        "{} {} to {} dB",
        "Normalizing".cyan().bold(),
        dir.display(),
        target_db
    );
    let outcome = gain_folder(&dir, &config.mp3gain(), target_db, true)?;
    outcome.print("Normalized");

    Ok(())
}

/// Bring every MP3 in `dir` to `target_db` in place.
pub fn gain_folder(
    dir: &Path,
    mp3gain: &Tool,
    target_db: i32,
    show_progress: bool,
) -> Result<BatchOutcome, Box<dyn Error>> {
    validate_dir_exists(dir)?;

    let files = list_files(dir, MP3_EXTENSIONS)?;
    let pb = create_progress_bar(files.len() as u64, !show_progress);
    let mut outcome = BatchOutcome::default();

    for name in &files {
        pb.set_message(name.clone());
        let path = dir.join(name);

        match mp3gain.run(&mp3gain_args(&path, target_db)) {
            Ok(_) => {
                log::info!("Normalized {} to {target_db} dB", path.display());
                outcome.processed += 1;
            }
            Err(e) if is_missing_tool(&*e) => {
                pb.finish_and_clear();
                log::error!("{e}, stopping normalization");
                return Err(format!(
                    "{} {e}. Set its path with 'mp3shuffle config set mp3gain_path <path>'",
                    "Error:".red().bold()
                )
                .into());
            }
            Err(e) => {
                log::error!("Failed to normalize {}: {e}", path.display());
                outcome.failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(outcome)
}
