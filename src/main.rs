#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use anyhow::{Context, Result};
use clap::Parser;
use emogames::app::dispatch;
use emogames::cli::{Cli, Commands};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn init_logging(log_level: &str) -> Result<()> {
    let level = log_level.parse::<Level>().unwrap_or_else(|_| {
        eprintln!("Warning: unknown log level '{log_level}', using info");
        Level::INFO
    });
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        init_logging("info")?;
        let path = dispatch::init_config(cli.config.as_deref(), force)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = dispatch::load_config(cli.config.as_deref())?;
    init_logging(&config.observability.log_level)?;
    dispatch::dispatch(cli, config).await
}
