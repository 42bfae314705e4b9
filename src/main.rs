use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use codemeta_crosswalk::cli::{self, Cli};
use codemeta_crosswalk::config::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_cli(Cli::parse())?;
    init_tracing(&settings)?;

    cli::run(&settings)?;
    Ok(())
}

/// Install the global subscriber: stderr by default, or an appended log file
/// without colours.
fn init_tracing(settings: &Settings) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(settings.log_level.directive()))
        .with_target(true);

    match &settings.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        },
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}
