//! The lifecycle of one file: classify, store, resolve, report.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use uploadhub_core::error::AppError;
use uploadhub_core::traits::object_store::ObjectStore;
use uploadhub_core::types::{FileUnit, UploadId, UploadOutcome};

use super::classify::classify;
use super::failure::{FailureStage, ItemFailure};

/// Where a task is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Created, waiting for a concurrency slot.
    Pending,
    /// Writing the object.
    Uploading,
    /// Object written, resolving its retrieval location.
    Resolving,
    /// Finished with an outcome.
    Succeeded,
    /// Finished with a failure.
    Failed,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Uploading => write!(f, "uploading"),
            Self::Resolving => write!(f, "resolving"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Uploads a single [`FileUnit`] and reports exactly one result.
///
/// The task owns its unit and shares nothing mutable with other tasks. It
/// issues one write and, if that succeeds, one location lookup. When the
/// lookup fails or the task is cancelled after the write, the written object
/// is deleted once if `cleanup_orphans` is set.
#[derive(Debug)]
pub struct UploadTask {
    index: usize,
    key: String,
    unit: FileUnit,
    store: Arc<dyn ObjectStore>,
    cleanup_orphans: bool,
    state: TaskState,
}

impl UploadTask {
    /// Create a task for the unit at `index` of its batch, stored under `key`.
    pub fn new(
        index: usize,
        unit: FileUnit,
        key: impl Into<String>,
        store: Arc<dyn ObjectStore>,
        cleanup_orphans: bool,
    ) -> Self {
        Self {
            index,
            key: key.into(),
            unit,
            store,
            cleanup_orphans,
            state: TaskState::Pending,
        }
    }

    /// Drive the task to completion.
    ///
    /// Waits for a slot from `permits` before hashing the contents or touching
    /// the store. If `cancel` fires first, or while the write or lookup is in
    /// flight, the task ends with a [`FailureStage::Cancelled`] failure.
    pub async fn run(
        mut self,
        permits: Arc<Semaphore>,
        cancel: CancellationToken,
    ) -> Result<UploadOutcome, ItemFailure> {
        let store = Arc::clone(&self.store);
        let key = self.key.clone();

        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = permits.acquire_owned() => Some(permit),
        };
        let _permit = match permit {
            None => {
                return Err(self.fail(
                    FailureStage::Cancelled,
                    AppError::cancelled("Upload cancelled before it started"),
                ));
            }
            Some(Err(_)) => {
                return Err(self.fail(
                    FailureStage::Cancelled,
                    AppError::internal("Upload slots are no longer available"),
                ));
            }
            Some(Ok(permit)) => permit,
        };
        let classification = classify(&self.unit.name, &self.unit.bytes);

        self.enter(TaskState::Uploading);
        let written = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = store.put(&key, self.unit.bytes.clone(), &classification.mime) => Some(result),
        };
        match written {
            None => {
                return Err(self.fail(
                    FailureStage::Cancelled,
                    AppError::cancelled("Upload cancelled while writing"),
                ));
            }
            Some(Err(e)) => return Err(self.fail(FailureStage::Upload, e)),
            Some(Ok(())) => {}
        }

        self.enter(TaskState::Resolving);
        let resolved = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = store.resolve_location(&key) => Some(result),
        };
        let mut failure = match resolved {
            Some(Ok(location)) if !location.is_empty() => {
                self.enter(TaskState::Succeeded);
                return Ok(UploadOutcome {
                    unique_id: UploadId::new(),
                    name: self.unit.name,
                    size: self.unit.size,
                    storage_location: location,
                    mime: classification.mime,
                    extension: classification.extension,
                    content_hash: classification.content_hash,
                });
            }
            Some(Ok(_)) => self.fail(
                FailureStage::Resolve,
                AppError::storage(format!("Object store returned an empty location for '{key}'")),
            ),
            Some(Err(e)) => self.fail(FailureStage::Resolve, e),
            None => self.fail(
                FailureStage::Cancelled,
                AppError::cancelled("Upload cancelled while resolving its location"),
            ),
        };

        if self.cleanup_orphans {
            if let Err(e) = self.remove_orphan(store.as_ref(), &key).await {
                failure.error.message = format!(
                    "{}; the stored object could not be removed: {e}",
                    failure.error.message
                );
            }
        }
        Err(failure)
    }

    async fn remove_orphan(&self, store: &dyn ObjectStore, key: &str) -> Result<(), AppError> {
        match store.delete(key).await {
            Ok(()) => {
                debug!(index = self.index, key, "Removed orphaned object");
                Ok(())
            }
            Err(e) => {
                error!(
                    index = self.index,
                    key,
                    error = %e,
                    "Failed to remove orphaned object"
                );
                Err(e)
            }
        }
    }

    fn enter(&mut self, next: TaskState) {
        debug!(
            index = self.index,
            name = %self.unit.name,
            from = %self.state,
            to = %next,
            "Upload task state change"
        );
        self.state = next;
    }

    fn fail(&mut self, stage: FailureStage, error: AppError) -> ItemFailure {
        warn!(
            index = self.index,
            name = %self.unit.name,
            %stage,
            error = %error,
            "Upload task failed"
        );
        self.enter(TaskState::Failed);
        ItemFailure::new(self.index, self.unit.name.clone(), stage, error)
    }
}
