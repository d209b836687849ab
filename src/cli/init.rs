use dialoguer::Confirm;
use mp3_shuffle::config::Config;
use owo_colors::OwoColorize;
use std::error::Error;

pub fn handle_init(force: bool) -> Result<(), Box<dyn Error>> {
    let config_path = Config::config_path()?;

    if Config::exists()? && !force {
        let overwrite = Confirm::new()
            .with_prompt(format!(
                "{} already exists. Overwrite it with the defaults?",
                config_path.display()
            ))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Keeping the existing configuration");
            return Ok(());
        }
    }

    let config = Config::new();
    config.save()?;

    println!("{} mp3shuffle initialized", "✓".green());
    println!("Configuration saved to: {}", config_path.display());
    println!(
        "Log file: {}",
        config.log_path()?.display().to_string().dimmed()
    );

    for tool in [config.ffmpeg(), config.ffprobe(), config.mp3gain()] {
        if !tool.exists() {
            println!(
                "{} {} was not found. Set its path with 'mp3shuffle config set {}_path <path>'",
                "Warning:".yellow().bold(),
                tool.program.display(),
                tool.name()
            );
        }
    }

    Ok(())
}
