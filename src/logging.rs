//! Log setup: warnings on the terminal, everything in the log file.

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::error::Error;
use std::fs::{self, File};
use std::path::Path;

/// Install the global logger.
///
/// `verbose` lowers the terminal threshold from warnings to info. The log
/// file is truncated on every run.
pub fn init(log_file: &Path, verbose: bool) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = log_file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .build();

    let term_level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(
            term_level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, config, File::create(log_file)?),
    ];
    CombinedLogger::init(loggers)?;

    Ok(())
}
