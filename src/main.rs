//! mp3shuffle - prepare a folder of labeled audio files for playback.
//!
//! File names carry a label in brackets, e.g. `[Jazz]So What.mp3`. The
//! `shuffle` command copies a folder into a new one in a random order that
//! keeps tracks with the same label apart, numbering the copies so that any
//! player sorting by name plays them in that order. The other commands
//! prepare the folder first: `convert` re-encodes to MP3, `clip` trims the
//! segments written into file names as `(start-end)`, and `gain` equalizes
//! loudness. `run` chains all four.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use mp3_shuffle::config::{Config, SETTABLE_KEYS};
use mp3_shuffle::logging;
use owo_colors::OwoColorize;
use std::error::Error;
use std::io;

mod cli;

use cli::shuffle::ShuffleArgs;

#[derive(Parser)]
#[command(name = "mp3shuffle")]
#[command(about = "Shuffle labeled audio files so that equal labels stay apart")]
#[command(version)]
struct Cli {
    /// Also print info-level log messages to the terminal
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct ShuffleFlags {
    /// Where to write the report (defaults to <output>/shuffle_report.txt)
    #[arg(short, long)]
    report: Option<String>,
    /// Keep the label in the new file names
    #[arg(short, long)]
    label: bool,
    /// Keep the display name in the new file names
    #[arg(short, long)]
    name: bool,
    /// Move files instead of copying them
    #[arg(long)]
    remove: bool,
    /// Seed for a reproducible order
    #[arg(long)]
    seed: Option<u64>,
    /// Only compute the order and write the report
    #[arg(long)]
    dry_run: bool,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// Replace a non-empty output folder without asking
    #[arg(short, long)]
    yes: bool,
}

impl From<ShuffleFlags> for ShuffleArgs {
    fn from(flags: ShuffleFlags) -> Self {
        Self {
            report: flags.report,
            label: flags.label,
            name: flags.name,
            remove: flags.remove,
            seed: flags.seed,
            dry_run: flags.dry_run,
            json: flags.json,
            yes: flags.yes,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration
    Init {
        /// Overwrite an existing configuration without asking
        #[arg(short, long)]
        force: bool,
    },
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Re-encode every audio file of a folder as MP3
    Convert {
        input: String,
        output: String,
        /// Delete each source file once converted
        #[arg(long)]
        remove: bool,
    },
    /// Trim or rename MP3 files carrying a (start-end) marker
    Clip {
        dir: String,
        /// Write results here instead of next to the sources
        #[arg(short, long)]
        output: Option<String>,
        /// Delete each source file once clipped
        #[arg(long)]
        remove: bool,
    },
    /// Equalize the loudness of every MP3 in a folder
    Gain {
        dir: String,
        /// Target loudness in dB (defaults to the configured target_db)
        #[arg(long, allow_hyphen_values = true)]
        db: Option<i32>,
    },
    /// Copy a folder into a new one in label-interleaved order
    Shuffle {
        input: String,
        output: String,
        #[command(flatten)]
        flags: ShuffleFlags,
    },
    /// Convert, clip, gain and shuffle in one go
    Run {
        source: String,
        /// Scratch folder for the converted files
        work: String,
        output: String,
        #[command(flatten)]
        flags: ShuffleFlags,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new(SETTABLE_KEYS.iter().copied()))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn init_logging(verbose: bool) {
    let log_path = match Config::load().and_then(|config| config.log_path()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{} {e}", "Warning:".yellow().bold());
            return;
        }
    };
    if let Err(e) = logging::init(&log_path, verbose) {
        eprintln!(
            "{} Could not open log file {}: {e}",
            "Warning:".yellow().bold(),
            log_path.display()
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Completions { .. }) {
        init_logging(cli.verbose);
    }

    match cli.command {
        Commands::Init { force } => {
            cli::init::handle_init(force)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        Commands::Convert {
            input,
            output,
            remove,
        } => {
            cli::convert::handle_convert(&input, &output, remove)?;
        }
        Commands::Clip {
            dir,
            output,
            remove,
        } => {
            cli::clip::handle_clip(&dir, output.as_deref(), remove)?;
        }
        Commands::Gain { dir, db } => {
            cli::gain::handle_gain(&dir, db)?;
        }
        Commands::Shuffle {
            input,
            output,
            flags,
        } => {
            cli::shuffle::handle_shuffle(&input, &output, &flags.into())?;
        }
        Commands::Run {
            source,
            work,
            output,
            flags,
        } => {
            cli::run::handle_run(&source, &work, &output, &flags.into())?;
        }
    }

    Ok(())
}
