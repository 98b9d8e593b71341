//! CLI command definitions and dispatch.

pub mod list;
pub mod migrate;
pub mod upload;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use uploadhub_core::config::AppConfig;
use uploadhub_core::error::AppError;
use uploadhub_service::UploadService;

use crate::output::OutputFormat;

/// UploadHub: concurrent multi-file uploads to object storage
#[derive(Debug, Parser)]
#[command(name = "uploadhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload one or more local files
    Upload(upload::UploadArgs),
    /// List recorded uploads
    List,
    /// Run ledger database migrations
    Migrate,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Upload(args) => upload::execute(args, config, self.format).await,
            Commands::List => list::execute(config, self.format).await,
            Commands::Migrate => migrate::execute(config).await,
        }
    }
}

/// Helper: build the upload service from configuration
pub async fn build_service(config: &AppConfig) -> Result<UploadService, AppError> {
    let store = uploadhub_storage::build_object_store(&config.storage).await?;
    let ledger = uploadhub_database::build_ledger(&config.ledger, &config.database).await?;
    Ok(UploadService::new(store, ledger, config.upload.clone()))
}

/// Helper: a token cancelled on Ctrl-C
pub fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling uploads");
            on_interrupt.cancel();
        }
    });
    token
}

