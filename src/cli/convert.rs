use super::BatchOutcome;
use mp3_shuffle::config::{Config, expand};
use mp3_shuffle::constants::MP3_EXTENSIONS;
use mp3_shuffle::media::{has_extension, list_audio_files};
use mp3_shuffle::tools::{Tool, ffmpeg_convert_args, is_missing_tool};
use mp3_shuffle::utils::progress::create_progress_bar;
use mp3_shuffle::utils::validation::validate_dir_exists;
use owo_colors::OwoColorize;
use std::error::Error;
use std::fs;
use std::path::Path;

pub fn handle_convert(input: &str, output: &str, remove: bool) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let input = expand(input);
    let output = expand(output);

    println!(
        "{} {} -> {}",
        "Converting".cyan().bold(),
        input.display(),
        output.display()
    );
    let outcome = convert_folder(
        &input,
        &output,
        &config.ffmpeg(),
        &config.bitrate,
        remove || config.remove_source,
        true,
    )?;
    outcome.print("Converted");

    Ok(())
}

/// Re-encode every audio file in `input` as `<stem>.mp3` in `output`.
///
/// MP3 files already sitting in `output` are left as they are.
pub fn convert_folder(
    input: &Path,
    output: &Path,
    ffmpeg: &Tool,
    bitrate: &str,
    remove: bool,
    show_progress: bool,
) -> Result<BatchOutcome, Box<dyn Error>> {
    validate_dir_exists(input)?;
    fs::create_dir_all(output)?;

    let files = list_audio_files(input)?;
    let same_folder = input.canonicalize()? == output.canonicalize()?;
    let pb = create_progress_bar(files.len() as u64, !show_progress);
    let mut outcome = BatchOutcome::default();

    for name in &files {
        pb.set_message(name.clone());
        let source = input.join(name);

        if same_folder && has_extension(&source, MP3_EXTENSIONS) {
            log::debug!("Already MP3, skipping: {}", source.display());
            outcome.skipped += 1;
            pb.inc(1);
            continue;
        }

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| name.clone());
        let target = output.join(format!("{stem}.mp3"));

        match ffmpeg.run(&ffmpeg_convert_args(&source, &target, bitrate)) {
            Ok(_) => {
                log::info!("Converted: {} -> {}", source.display(), target.display());
                outcome.processed += 1;
                if remove {
                    fs::remove_file(&source)?;
                    log::info!("Removed source file: {}", source.display());
                }
            }
            Err(e) if is_missing_tool(&*e) => {
                pb.finish_and_clear();
                log::error!("{e}, stopping conversion");
                return Err(format!(
                    "{} {e}. Set its path with 'mp3shuffle config set ffmpeg_path <path>'",
                    "Error:".red().bold()
                )
                .into());
            }
            Err(e) => {
                log::error!("Failed to convert {}: {e}", source.display());
                outcome.failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(outcome)
}
