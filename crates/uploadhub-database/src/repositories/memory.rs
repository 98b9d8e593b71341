//! In-memory metadata ledger for development and tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use uploadhub_core::result::AppResult;
use uploadhub_core::traits::ledger::MetadataLedger;
use uploadhub_core::types::{LedgerRecord, RecordId, UploadOutcome};

/// Ledger holding records in insertion order behind an async lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    records: Arc<RwLock<Vec<LedgerRecord>>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded uploads.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl MetadataLedger for InMemoryLedger {
    fn ledger_type(&self) -> &str {
        "memory"
    }

    async fn persist(&self, outcome: &UploadOutcome) -> AppResult<RecordId> {
        let mut records = self.records.write().await;
        if let Some(existing) = records
            .iter_mut()
            .find(|r| r.outcome.unique_id == outcome.unique_id)
        {
            existing.outcome = outcome.clone();
            return Ok(existing.record_id);
        }

        let record_id = RecordId::new();
        records.push(LedgerRecord {
            record_id,
            outcome: outcome.clone(),
            created_at: Utc::now(),
        });
        Ok(record_id)
    }

    async fn list(&self) -> AppResult<Vec<LedgerRecord>> {
        Ok(self.records.read().await.clone())
    }
}
