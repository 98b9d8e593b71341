//! File upload CLI command.

use std::path::{Path, PathBuf};

use clap::Args;
use futures::future::try_join_all;
use tracing::info;

use uploadhub_core::config::AppConfig;
use uploadhub_core::error::{AppError, ErrorKind};
use uploadhub_core::types::FileUnit;

use crate::output::{self, OutputFormat, UploadRow};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Override the maximum number of concurrent uploads
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override the object key prefix
    #[arg(long)]
    pub prefix: Option<String>,
}

/// Execute the upload command
pub async fn execute(
    args: &UploadArgs,
    mut config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if let Some(concurrency) = args.concurrency {
        config.upload.max_concurrency = concurrency;
    }
    if let Some(prefix) = &args.prefix {
        config.upload.key_prefix = prefix.clone();
    }

    let units = try_join_all(args.files.iter().map(|path| read_unit(path))).await?;
    let total_bytes: i64 = units.iter().map(|u| u.size).sum();
    info!(files = units.len(), total_bytes, "Read files for upload");

    let service = super::build_service(&config).await?;
    let cancel = super::interrupt_token();
    let persisted = service.upload_all(units, &cancel).await?;

    let rows: Vec<UploadRow> = persisted.iter().map(UploadRow::from).collect();
    output::print_list(&rows, format);
    if format == OutputFormat::Table {
        output::print_success(&format!("Uploaded {} file(s)", rows.len()));
    }
    Ok(())
}

/// Read one local file into a unit named after its file name.
async fn read_unit(path: &Path) -> Result<FileUnit, AppError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::validation(format!("Not a file path: {}", path.display())))?
        .to_string();

    let content = tokio::fs::read(path).await.map_err(|e| {
        let kind = if e.kind() == std::io::ErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            ErrorKind::Internal
        };
        AppError::with_source(kind, format!("Failed to read {}", path.display()), e)
    })?;

    Ok(FileUnit::from_bytes(name, content))
}
