//! Upload pipeline domain types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::id::{RecordId, UploadId};

/// One file handed over by the ingestion boundary: its name, declared size,
/// and fully buffered contents.
#[derive(Debug, Clone)]
pub struct FileUnit {
    /// File name, also used as the object key (after prefixing).
    pub name: String,
    /// Size declared by the ingestion boundary.
    pub size: i64,
    /// Buffered file contents.
    pub bytes: Bytes,
}

impl FileUnit {
    /// Create a unit with an explicitly declared size.
    pub fn new(name: impl Into<String>, size: i64, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            size,
            bytes: bytes.into(),
        }
    }

    /// Create a unit whose declared size is the buffer length.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let size = bytes.len() as i64;
        Self {
            name: name.into(),
            size,
            bytes,
        }
    }

    /// Reject malformed units before they are dispatched.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }
        if self.size < 0 {
            return Err(AppError::validation(format!(
                "File '{}' declares a negative size ({})",
                self.name, self.size
            )));
        }
        if self.size as u64 != self.bytes.len() as u64 {
            return Err(AppError::validation(format!(
                "File '{}' declares {} bytes but {} were received",
                self.name,
                self.size,
                self.bytes.len()
            )));
        }
        Ok(())
    }
}

/// The record produced for every successfully stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// Fresh identifier, never reused across outcomes.
    pub unique_id: UploadId,
    /// Original file name.
    pub name: String,
    /// File size in bytes.
    pub size: i64,
    /// Resolved retrieval location.
    pub storage_location: String,
    /// Sniffed MIME type.
    pub mime: String,
    /// Extension token derived from the file name.
    pub extension: String,
    /// Hex-encoded SHA-256 of the uploaded bytes.
    pub content_hash: String,
}

/// An upload outcome as recorded by the metadata ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Ledger-assigned identifier.
    pub record_id: RecordId,
    /// The recorded outcome.
    pub outcome: UploadOutcome,
    /// When the record was first written.
    pub created_at: DateTime<Utc>,
}

/// An outcome paired with the identifier the ledger persisted it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedUpload {
    /// Ledger-assigned identifier.
    pub record_id: RecordId,
    /// The persisted outcome.
    pub outcome: UploadOutcome,
}
