//! Upload service: runs batches and records their outcomes.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use uploadhub_core::config::UploadConfig;
use uploadhub_core::error::AppError;
use uploadhub_core::traits::ledger::MetadataLedger;
use uploadhub_core::traits::object_store::ObjectStore;
use uploadhub_core::types::{FileUnit, LedgerRecord, PersistedUpload};

use super::orchestrator::BatchUploader;

/// Uploads batches to the object store and persists the outcomes of fully
/// successful batches to the metadata ledger.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Batch orchestrator.
    uploader: BatchUploader,
    /// Metadata ledger.
    ledger: Arc<dyn MetadataLedger>,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        ledger: Arc<dyn MetadataLedger>,
        config: UploadConfig,
    ) -> Self {
        Self {
            uploader: BatchUploader::new(store, config),
            ledger,
        }
    }

    /// Uploads every unit and records the outcomes.
    ///
    /// Nothing is persisted unless every unit uploaded. A failed batch is
    /// reported as one error listing each failed file.
    pub async fn upload_all(
        &self,
        units: Vec<FileUnit>,
        cancel: &CancellationToken,
    ) -> Result<Vec<PersistedUpload>, AppError> {
        if units.is_empty() {
            return Err(AppError::validation("No files were provided for upload"));
        }

        let outcomes = self.uploader.upload(units, cancel).await?;
        let record_ids = self.ledger.persist_batch(&outcomes).await?;

        info!(
            files = outcomes.len(),
            ledger = self.ledger.ledger_type(),
            "Recorded uploaded files"
        );

        Ok(record_ids
            .into_iter()
            .zip(outcomes)
            .map(|(record_id, outcome)| PersistedUpload { record_id, outcome })
            .collect())
    }

    /// Uploads and records a single file.
    pub async fn upload_one(
        &self,
        unit: FileUnit,
        cancel: &CancellationToken,
    ) -> Result<PersistedUpload, AppError> {
        self.upload_all(vec![unit], cancel)
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Upload produced no record"))
    }

    /// Lists every recorded upload, oldest first.
    pub async fn list_uploads(&self) -> Result<Vec<LedgerRecord>, AppError> {
        self.ledger.list().await
    }
}
