//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use uploadhub_core::types::{LedgerRecord, PersistedUpload, UploadOutcome};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One uploaded file as printed by `upload`.
#[derive(Debug, Serialize, Tabled)]
pub struct UploadRow {
    /// Ledger record ID
    #[tabled(rename = "Record")]
    pub record_id: String,
    /// File name
    #[tabled(rename = "Name")]
    pub name: String,
    /// Size in bytes
    #[tabled(rename = "Size")]
    pub size: i64,
    /// MIME type
    #[tabled(rename = "MIME")]
    pub mime: String,
    /// Extension
    #[tabled(rename = "Ext")]
    pub extension: String,
    /// SHA-256 of the contents
    #[tabled(rename = "SHA-256")]
    pub content_hash: String,
    /// Retrieval location
    #[tabled(rename = "Location")]
    pub location: String,
}

impl UploadRow {
    fn new(record_id: String, outcome: &UploadOutcome) -> Self {
        Self {
            record_id,
            name: outcome.name.clone(),
            size: outcome.size,
            mime: outcome.mime.clone(),
            extension: outcome.extension.clone(),
            content_hash: outcome.content_hash.clone(),
            location: outcome.storage_location.clone(),
        }
    }
}

impl From<&PersistedUpload> for UploadRow {
    fn from(persisted: &PersistedUpload) -> Self {
        Self::new(persisted.record_id.to_string(), &persisted.outcome)
    }
}

/// One ledger record as printed by `list`.
#[derive(Debug, Serialize, Tabled)]
pub struct RecordRow {
    /// Upload details
    #[tabled(inline)]
    #[serde(flatten)]
    pub upload: UploadRow,
    /// When it was recorded
    #[tabled(rename = "Recorded")]
    pub created_at: String,
}

impl From<&LedgerRecord> for RecordRow {
    fn from(record: &LedgerRecord) -> Self {
        Self {
            upload: UploadRow::new(record.record_id.to_string(), &record.outcome),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    eprintln!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}
