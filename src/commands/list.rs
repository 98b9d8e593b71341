//! List recorded uploads.

use uploadhub_core::config::AppConfig;
use uploadhub_core::error::AppError;

use crate::output::{self, OutputFormat, RecordRow};

/// Execute the list command
pub async fn execute(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    if config.ledger.provider == "memory" {
        output::print_warning("The memory ledger does not keep records between runs");
    }

    let service = super::build_service(&config).await?;
    let records = service.list_uploads().await?;

    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
