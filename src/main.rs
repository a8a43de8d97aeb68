//! GreenChoice - cross-site sustainable product comparison.
//!
//! Main entry point for the GreenChoice CLI.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use greenchoice_config::{Config, ConfigLoader, ConfigValidator};
use greenchoice_protocols::ProductDescriptor;

mod cli;
mod cmd_compare;
mod cmd_query;

use cli::{Cli, Commands};
use cmd_compare::{handle_best_command, handle_compare_command};
use cmd_query::handle_query_command;

/// Get the GreenChoice home directory (~/.greenchoice).
fn greenchoice_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".greenchoice")
}

/// Initialize tracing with console and daily rolling file output.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = greenchoice_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("greenchoice")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes the file writer on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true).with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Load the configuration file, falling back to the user config and then
/// built-in defaults when it does not exist, and validate it.
fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        info!("Loading configuration from {}", path.display());
        ConfigLoader::load(path)?
    } else {
        ConfigLoader::load_or_default(None)?
    };

    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Compare {
            title,
            breadcrumb,
            description,
        } => {
            let product = ProductDescriptor::new(title)
                .with_breadcrumb(breadcrumb)
                .with_description(description);
            handle_compare_command(&config, product, cli.format).await
        }
        Commands::Query { title, breadcrumb } => {
            handle_query_command(&config, &title, &breadcrumb, cli.format)
        }
        Commands::Best { url } => handle_best_command(&config, &url, cli.format).await,
    }
}
