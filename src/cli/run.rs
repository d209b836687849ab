use super::clip::clip_folder;
use super::convert::convert_folder;
use super::gain::gain_folder;
use super::shuffle::{ShuffleArgs, build_options, confirm_overwrite};
use mp3_shuffle::config::{Config, expand};
use mp3_shuffle::randomize::randomize;
use mp3_shuffle::report::render;
use mp3_shuffle::utils::validation::validate_distinct_output;
use owo_colors::OwoColorize;
use std::error::Error;

/// Full pipeline: `source` is converted into `work`, where markers are
/// clipped and loudness is equalized, and `work` is then shuffled into
/// `output`.
pub fn handle_run(
    source: &str,
    work: &str,
    output: &str,
    args: &ShuffleArgs,
) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let source = expand(source);
    let work = expand(work);
    let output = expand(output);

    // The shuffle wipes `output`, which must not take either folder with it
    validate_distinct_output(&source, &output)?;
    if !args.dry_run && !args.yes && !confirm_overwrite(&output)? {
        println!("Run cancelled");
        return Ok(());
    }

    println!("{} 1/4 convert", "Step".cyan().bold());
    let converted = convert_folder(
        &source,
        &work,
        &config.ffmpeg(),
        &config.bitrate,
        config.remove_source,
        true,
    )?;
    converted.print("Converted");

    println!("{} 2/4 clip", "Step".cyan().bold());
    let clipped = clip_folder(
        &work,
        &work,
        &config.ffmpeg(),
        &config.ffprobe(),
        true,
        true,
    )?;
    clipped.print("Clipped");

    println!("{} 3/4 gain", "Step".cyan().bold());
    let gained = gain_folder(&work, &config.mp3gain(), config.target_db, true)?;
    gained.print("Normalized");

    println!("{} 4/4 shuffle", "Step".cyan().bold());
    let options = build_options(&config, &work, &output, args);
    let summary = randomize(&options)?;

    match &summary.plan {
        Some(plan) => println!(
            "{} {} files shuffled into {}, {} adjacent collisions, quality {:.1}%",
            "✓".green(),
            plan.total,
            output.display(),
            plan.collisions,
            plan.quality
        ),
        None => println!(
            "{} Nothing to shuffle in {}",
            "Warning:".yellow().bold(),
            work.display()
        ),
    }
    match &options.report {
        Some(report) => println!("Report: {}", report.display()),
        None => {
            if let Some(plan) = &summary.plan {
                print!("{}", render(plan));
            }
        }
    }

    Ok(())
}
