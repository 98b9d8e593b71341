//! # uploadhub-core
//!
//! Core crate for UploadHub. Contains the collaborator traits consumed by the
//! upload pipeline (object store, metadata ledger), configuration schemas,
//! typed identifiers, upload domain types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other UploadHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
