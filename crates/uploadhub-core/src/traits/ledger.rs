//! Metadata ledger trait recording per-file upload metadata.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::RecordId;
use crate::types::upload::{LedgerRecord, UploadOutcome};

/// Persistence gate for upload outcomes.
///
/// Writes are upserts keyed by the outcome's `unique_id`: persisting the same
/// outcome twice yields the same [`RecordId`].
#[async_trait]
pub trait MetadataLedger: Send + Sync + std::fmt::Debug + 'static {
    /// Return the ledger type name (e.g., "postgres", "memory").
    fn ledger_type(&self) -> &str;

    /// Persist a single outcome and return its record identifier.
    async fn persist(&self, outcome: &UploadOutcome) -> AppResult<RecordId>;

    /// Persist several outcomes, returning identifiers in input order.
    async fn persist_batch(&self, outcomes: &[UploadOutcome]) -> AppResult<Vec<RecordId>> {
        let mut ids = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            ids.push(self.persist(outcome).await?);
        }
        Ok(ids)
    }

    /// List every recorded upload, oldest first.
    async fn list(&self) -> AppResult<Vec<LedgerRecord>>;
}
