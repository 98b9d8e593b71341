//! Metadata ledger implementations.

pub mod memory;
pub mod upload;

use std::sync::Arc;

use tracing::info;

use uploadhub_core::config::{DatabaseConfig, LedgerConfig};
use uploadhub_core::error::AppError;
use uploadhub_core::result::AppResult;
use uploadhub_core::traits::ledger::MetadataLedger;

use crate::connection::DatabasePool;

pub use memory::InMemoryLedger;
pub use upload::UploadRecordRepository;

/// Instantiate the ledger selected by `ledger.provider`.
pub async fn build_ledger(
    ledger: &LedgerConfig,
    database: &DatabaseConfig,
) -> AppResult<Arc<dyn MetadataLedger>> {
    let built: Arc<dyn MetadataLedger> = match ledger.provider.as_str() {
        "memory" => Arc::new(InMemoryLedger::new()),
        "postgres" => {
            let pool = DatabasePool::connect(database).await?;
            Arc::new(UploadRecordRepository::new(pool.into_pool()))
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown ledger provider: {other}"
            )));
        }
    };

    info!(ledger = built.ledger_type(), "Metadata ledger initialized");
    Ok(built)
}
