//! PostgreSQL-backed metadata ledger over the `uploaded_files` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use uploadhub_core::error::{AppError, ErrorKind};
use uploadhub_core::result::AppResult;
use uploadhub_core::traits::ledger::MetadataLedger;
use uploadhub_core::types::{LedgerRecord, RecordId, UploadId, UploadOutcome};

const UPSERT_SQL: &str = r#"
    INSERT INTO uploaded_files (id, unique_id, file_name, file_size, url, mime, ext, sha256)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    ON CONFLICT (unique_id) DO UPDATE SET
        file_name = EXCLUDED.file_name,
        file_size = EXCLUDED.file_size,
        url = EXCLUDED.url,
        mime = EXCLUDED.mime,
        ext = EXCLUDED.ext,
        sha256 = EXCLUDED.sha256,
        updated_at = now()
    RETURNING id
"#;

/// A row of the `uploaded_files` table.
#[derive(Debug, Clone, FromRow)]
struct UploadedFileRow {
    id: Uuid,
    unique_id: Uuid,
    file_name: String,
    file_size: i64,
    url: String,
    mime: String,
    ext: String,
    sha256: String,
    created_at: DateTime<Utc>,
}

impl From<UploadedFileRow> for LedgerRecord {
    fn from(row: UploadedFileRow) -> Self {
        Self {
            record_id: RecordId::from_uuid(row.id),
            outcome: UploadOutcome {
                unique_id: UploadId::from_uuid(row.unique_id),
                name: row.file_name,
                size: row.file_size,
                storage_location: row.url,
                mime: row.mime,
                extension: row.ext,
                content_hash: row.sha256,
            },
            created_at: row.created_at,
        }
    }
}

/// Repository persisting upload outcomes to PostgreSQL.
#[derive(Debug, Clone)]
pub struct UploadRecordRepository {
    pool: PgPool,
}

impl UploadRecordRepository {
    /// Create a new upload record repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert<'e, E>(executor: E, outcome: &UploadOutcome) -> AppResult<RecordId>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let id: Uuid = sqlx::query_scalar(UPSERT_SQL)
            .bind(Uuid::new_v4())
            .bind(outcome.unique_id.into_uuid())
            .bind(&outcome.name)
            .bind(outcome.size)
            .bind(&outcome.storage_location)
            .bind(&outcome.mime)
            .bind(&outcome.extension)
            .bind(&outcome.content_hash)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to persist upload '{}'", outcome.name),
                    e,
                )
            })?;
        Ok(RecordId::from_uuid(id))
    }
}

#[async_trait]
impl MetadataLedger for UploadRecordRepository {
    fn ledger_type(&self) -> &str {
        "postgres"
    }

    async fn persist(&self, outcome: &UploadOutcome) -> AppResult<RecordId> {
        Self::upsert(&self.pool, outcome).await
    }

    async fn persist_batch(&self, outcomes: &[UploadOutcome]) -> AppResult<Vec<RecordId>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut ids = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            ids.push(Self::upsert(&mut *tx, outcome).await?);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit upload batch", e)
        })?;
        Ok(ids)
    }

    async fn list(&self) -> AppResult<Vec<LedgerRecord>> {
        let rows = sqlx::query_as::<_, UploadedFileRow>(
            "SELECT id, unique_id, file_name, file_size, url, mime, ext, sha256, created_at \
             FROM uploaded_files ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list uploads", e))?;

        Ok(rows.into_iter().map(LedgerRecord::from).collect())
    }
}
