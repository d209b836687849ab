pub mod clip;
pub mod config;
pub mod convert;
pub mod gain;
pub mod init;
pub mod run;
pub mod shuffle;

use owo_colors::OwoColorize;

/// Tally of a per-file batch over an external tool.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchOutcome {
    pub fn print(&self, verb: &str) {
        println!(
            "{} {} {} file(s)",
            "✓".green(),
            verb,
            self.processed.to_string().bold()
        );
        if self.skipped > 0 {
            println!("  {} skipped", self.skipped.to_string().yellow());
        }
        if self.failed > 0 {
            println!(
                "  {} failed (see the log file for details)",
                self.failed.to_string().red()
            );
        }
    }
}
