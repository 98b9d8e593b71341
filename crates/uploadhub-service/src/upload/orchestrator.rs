//! Batch fan-out and fan-in.
//!
//! Every valid unit runs as its own [`UploadTask`] on the tokio runtime. The
//! task's join handle carries its outcome back to a slot fixed by the unit's
//! batch position, while failures flow over one bounded channel into a single
//! collector task. The channel is sized to the batch, so no sender ever
//! waits on the collector.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use uploadhub_core::config::UploadConfig;
use uploadhub_core::error::AppError;
use uploadhub_core::traits::object_store::ObjectStore;
use uploadhub_core::types::{FileUnit, UploadOutcome};

use super::failure::{FailureSet, FailureStage, ItemFailure};
use super::task::UploadTask;

/// Everything a batch produced: outcomes of the files that succeeded, in
/// submission order, and the failures of those that did not.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Outcomes ordered by batch position.
    pub outcomes: Vec<UploadOutcome>,
    /// Failures ordered by batch position.
    pub failures: FailureSet,
    submitted: usize,
}

impl BatchResult {
    /// Number of units submitted.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Whether every submitted unit is either an outcome or a failure.
    pub fn is_accounted(&self) -> bool {
        self.outcomes.len() + self.failures.len() == self.submitted
    }

    /// Whether no unit failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// All-or-nothing view: the outcomes if no unit failed, otherwise every
    /// failure.
    pub fn into_result(self) -> Result<Vec<UploadOutcome>, FailureSet> {
        if self.failures.is_empty() {
            Ok(self.outcomes)
        } else {
            Err(self.failures)
        }
    }
}

/// Runs upload batches against an object store.
#[derive(Debug, Clone)]
pub struct BatchUploader {
    store: Arc<dyn ObjectStore>,
    config: UploadConfig,
}

impl BatchUploader {
    /// Create an uploader writing to `store`.
    pub fn new(store: Arc<dyn ObjectStore>, config: UploadConfig) -> Self {
        Self { store, config }
    }

    /// Upload a batch, succeeding only if every unit succeeds.
    pub async fn upload(
        &self,
        units: Vec<FileUnit>,
        cancel: &CancellationToken,
    ) -> Result<Vec<UploadOutcome>, FailureSet> {
        self.run(units, cancel).await.into_result()
    }

    /// Upload a batch and report every unit's result.
    ///
    /// Returns only after every dispatched task has finished. Cancelling
    /// `cancel`, or reaching the configured batch timeout, makes tasks that
    /// have not finished report a cancellation failure.
    pub async fn run(&self, units: Vec<FileUnit>, cancel: &CancellationToken) -> BatchResult {
        let submitted = units.len();
        let started = Instant::now();
        info!(
            files = submitted,
            max_concurrency = self.config.concurrency(),
            provider = self.store.provider_type(),
            "Starting upload batch"
        );
        warn_duplicate_names(&units);

        let batch_cancel = cancel.child_token();
        let _batch_guard = batch_cancel.clone().drop_guard();
        if let Some(timeout) = self.config.batch_timeout() {
            let deadline = batch_cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = deadline.cancelled() => {}
                    _ = tokio::time::sleep(timeout) => {
                        warn!(timeout_secs = timeout.as_secs(), "Upload batch timed out");
                        deadline.cancel();
                    }
                }
            });
        }

        let names: Vec<String> = units.iter().map(|u| u.name.clone()).collect();
        let (failure_tx, mut failure_rx) = mpsc::channel::<ItemFailure>(submitted.max(1));
        let collector = tokio::spawn(async move {
            let mut failures = FailureSet::with_capacity(submitted);
            while let Some(failure) = failure_rx.recv().await {
                failures.push(failure);
            }
            failures
        });
        let permits = Arc::new(Semaphore::new(self.config.concurrency()));
        let mut handles: Vec<(usize, JoinHandle<Option<UploadOutcome>>)> =
            Vec::with_capacity(submitted);

        for (index, unit) in units.into_iter().enumerate() {
            if let Err(e) = unit.validate() {
                warn!(index, name = %unit.name, error = %e, "Rejected file before upload");
                report(
                    &failure_tx,
                    ItemFailure::new(index, unit.name, FailureStage::Validation, e),
                )
                .await;
                continue;
            }

            let key = self.config.object_key(&unit.name);
            let task = UploadTask::new(
                index,
                unit,
                key,
                Arc::clone(&self.store),
                self.config.cleanup_orphans,
            );
            let permits = Arc::clone(&permits);
            let cancel = batch_cancel.clone();
            let failures = failure_tx.clone();

            let handle = tokio::spawn(async move {
                match task.run(permits, cancel).await {
                    Ok(outcome) => Some(outcome),
                    Err(failure) => {
                        report(&failures, failure).await;
                        None
                    }
                }
            });
            handles.push((index, handle));
        }

        let mut slots: Vec<Option<UploadOutcome>> = (0..submitted).map(|_| None).collect();
        for (index, handle) in handles {
            match handle.await {
                Ok(Some(outcome)) => slots[index] = Some(outcome),
                Ok(None) => {}
                Err(join_error) => {
                    let name = names[index].clone();
                    error!(index, name = %name, error = %join_error, "Upload task aborted");
                    let stage = if join_error.is_panic() {
                        FailureStage::Panicked
                    } else {
                        FailureStage::Cancelled
                    };
                    let error = AppError::internal(format!(
                        "Upload task for '{name}' ended abnormally: {join_error}"
                    ));
                    report(&failure_tx, ItemFailure::new(index, name, stage, error)).await;
                }
            }
        }
        drop(failure_tx);

        let failures = match collector.await {
            Ok(failures) => failures,
            Err(join_error) => {
                error!(error = %join_error, "Failure collector aborted");
                unreported_failures(&slots, &names)
            }
        };

        let outcomes: Vec<UploadOutcome> = slots.into_iter().flatten().collect();
        info!(
            files = submitted,
            succeeded = outcomes.len(),
            failed = failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Upload batch finished"
        );

        BatchResult {
            outcomes,
            failures,
            submitted,
        }
    }
}

async fn report(channel: &mpsc::Sender<ItemFailure>, failure: ItemFailure) {
    if let Err(mpsc::error::SendError(lost)) = channel.send(failure).await {
        error!(failure = %lost, "Failure collector closed before report");
    }
}

/// Failures for every slot without an outcome, used when the collected
/// reports are lost.
fn unreported_failures(slots: &[Option<UploadOutcome>], names: &[String]) -> FailureSet {
    let mut failures = FailureSet::new();
    for (index, _) in slots.iter().enumerate().filter(|(_, slot)| slot.is_none()) {
        failures.push(ItemFailure::new(
            index,
            names[index].clone(),
            FailureStage::Panicked,
            AppError::internal("Failure report was lost"),
        ));
    }
    failures
}

fn warn_duplicate_names(units: &[FileUnit]) {
    let mut seen = HashSet::with_capacity(units.len());
    for unit in units {
        if !seen.insert(unit.name.as_str()) {
            warn!(
                name = %unit.name,
                "Batch contains the same file name more than once; the object key is shared"
            );
        }
    }
}
