//! Upload pipeline: classification, single-item tasks, batch orchestration,
//! failure aggregation, and the persistence-facing service.

pub mod classify;
pub mod failure;
pub mod orchestrator;
pub mod service;
pub mod task;

pub use classify::{Classification, classify};
pub use failure::{FailureSet, FailureStage, ItemFailure};
pub use orchestrator::{BatchResult, BatchUploader};
pub use service::UploadService;
pub use task::{TaskState, UploadTask};
