//! UploadHub CLI entry point.
//!
//! Loads configuration, initializes logging, and dispatches the selected
//! command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use uploadhub_core::config::AppConfig;
use uploadhub_core::error::AppError;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(config).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay, and variables
fn load_configuration(cli_path: &str) -> Result<AppConfig, AppError> {
    let config_path = std::env::var("UPLOADHUB_CONFIG").unwrap_or_else(|_| cli_path.to_string());
    let env = std::env::var("UPLOADHUB_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging. Logs go to stderr so command output stays
/// parseable.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
