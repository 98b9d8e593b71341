//! Core type definitions used across the UploadHub workspace.

pub mod id;
pub mod upload;

pub use id::*;
pub use upload::{FileUnit, LedgerRecord, PersistedUpload, UploadOutcome};
