//! Shortsmith CLI entry point.

use anyhow::Result;
use clap::Parser;
use shortsmith::cli::{commands, Cli, Commands};
use shortsmith::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("shortsmith={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    match &cli.command {
        Commands::Script { topic, output } => {
            commands::run_script(topic, output.clone(), settings).await?;
        }

        Commands::Timeline {
            script,
            captions,
            output,
            max_attempts,
        } => {
            commands::run_timeline(script, captions, output.clone(), *max_attempts, settings).await?;
        }

        Commands::Merge { segments, output } => {
            commands::run_merge(segments, output.clone())?;
        }

        Commands::Config { action } => {
            commands::run_config(action, cli.config.as_deref(), settings)?;
        }
    }

    Ok(())
}
