use dialoguer::Confirm;
use mp3_shuffle::config::{Config, expand};
use mp3_shuffle::constants::DEFAULT_REPORT_NAME;
use mp3_shuffle::plan::ShufflePlan;
use mp3_shuffle::randomize::{RandomizeOptions, RandomizeSummary, randomize};
use mp3_shuffle::report::{format_average, format_total, render, render_empty};
use owo_colors::OwoColorize;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Command line flags of `shuffle`, layered over the configuration.
#[derive(Debug, Default)]
pub struct ShuffleArgs {
    pub report: Option<String>,
    pub label: bool,
    pub name: bool,
    pub remove: bool,
    pub seed: Option<u64>,
    pub dry_run: bool,
    pub json: bool,
    pub yes: bool,
}

pub fn handle_shuffle(input: &str, output: &str, args: &ShuffleArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let options = build_options(&config, &expand(input), &expand(output), args);

    if !args.dry_run && !args.yes && !confirm_overwrite(&options.output)? {
        println!("Shuffle cancelled");
        return Ok(());
    }

    let summary = randomize(&options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if options.report.is_none() {
        match &summary.plan {
            Some(plan) => print!("{}", render(plan)),
            None => print!("{}", render_empty()),
        }
    }
    print_summary(&options, &summary);

    Ok(())
}

pub fn build_options(
    config: &Config,
    input: &Path,
    output: &Path,
    args: &ShuffleArgs,
) -> RandomizeOptions {
    let mut naming = config.naming();
    naming.with_label |= args.label;
    naming.with_name |= args.name;

    // A dry run must not write into `output`, so its report goes to stdout
    let report = match &args.report {
        Some(path) => Some(expand(path)),
        None if args.dry_run => None,
        None => Some(output.join(DEFAULT_REPORT_NAME)),
    };

    RandomizeOptions {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        report,
        naming,
        remove_source: args.remove || config.remove_source,
        interleave: config.interleave_options(args.seed),
        ffprobe: config.ffprobe(),
        dry_run: args.dry_run,
        show_progress: !args.json,
    }
}

/// Ask before a non-empty `output` gets wiped.
pub fn confirm_overwrite(output: &Path) -> Result<bool, Box<dyn Error>> {
    let occupied = match fs::read_dir(output) {
        Ok(mut entries) => entries.next().is_some(),
        Err(_) => false,
    };
    if !occupied {
        return Ok(true);
    }

    Ok(Confirm::new()
        .with_prompt(format!(
            "{} is not empty and will be replaced. Continue?",
            output.display()
        ))
        .default(false)
        .interact()?)
}

fn print_summary(options: &RandomizeOptions, summary: &RandomizeSummary) {
    let Some(plan) = &summary.plan else {
        println!(
            "{} No audio files in {}",
            "Warning:".yellow().bold(),
            options.input.display()
        );
        print_report_path(options);
        return;
    };

    print_plan(plan);

    if options.dry_run {
        println!("{} Dry run, nothing was copied", "ℹ".blue());
    } else {
        let verb = if options.remove_source { "Moved" } else { "Copied" };
        println!(
            "{} {} {} file(s) to {}",
            "✓".green(),
            verb,
            summary.copied.to_string().bold(),
            options.output.display()
        );
    }
    print_report_path(options);
}

fn print_report_path(options: &RandomizeOptions) {
    if let Some(report) = &options.report {
        println!("Report: {}", report.display());
    }
}

fn print_plan(plan: &ShufflePlan) {
    println!("{}", "Labels".cyan().bold());
    for stats in &plan.labels {
        println!(
            "  {}: {} - {} - {}",
            stats.label.bold(),
            stats.count,
            format_total(stats.total_seconds()),
            format_average(stats.average_seconds())
        );
    }

    let collisions = if plan.collisions == 0 {
        plan.collisions.to_string().green().to_string()
    } else {
        plan.collisions.to_string().yellow().to_string()
    };
    println!(
        "{} {} files, {} adjacent collisions, quality {:.1}%",
        "Shuffled".cyan().bold(),
        plan.total,
        collisions,
        plan.quality
    );
}
