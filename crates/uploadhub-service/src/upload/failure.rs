//! Per-file failures and their batch-wide aggregation.

use std::fmt;

use thiserror::Error;

use uploadhub_core::error::{AppError, ErrorKind};

/// The point in a file's lifecycle at which it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// Rejected before dispatch.
    Validation,
    /// The object-store write failed.
    Upload,
    /// The write succeeded but the retrieval location could not be resolved.
    Resolve,
    /// The task was cancelled before finishing.
    Cancelled,
    /// The task panicked.
    Panicked,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Upload => write!(f, "upload"),
            Self::Resolve => write!(f, "resolve"),
            Self::Cancelled => write!(f, "cancellation"),
            Self::Panicked => write!(f, "task panic"),
        }
    }
}

/// One failed file of a batch.
#[derive(Debug, Clone, Error)]
#[error("file #{} '{name}' failed at {stage}: {error}", .index + 1)]
pub struct ItemFailure {
    /// Zero-based position of the file in the submitted batch.
    pub index: usize,
    /// File name as submitted.
    pub name: String,
    /// Where the file failed.
    pub stage: FailureStage,
    /// The underlying error.
    pub error: AppError,
}

impl ItemFailure {
    /// Create a failure record.
    pub fn new(index: usize, name: impl Into<String>, stage: FailureStage, error: AppError) -> Self {
        Self {
            index,
            name: name.into(),
            stage,
            error,
        }
    }
}

/// Every failed file of one batch. Displays as the newline-joined message
/// of each failure, ordered by batch position.
#[derive(Debug, Clone, Default)]
pub struct FailureSet {
    failures: Vec<ItemFailure>,
}

impl FailureSet {
    /// Create an empty failure set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with room for `capacity` failures.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            failures: Vec::with_capacity(capacity),
        }
    }

    /// Record a failure, keeping the set ordered by batch position.
    pub fn push(&mut self, failure: ItemFailure) {
        let at = self
            .failures
            .partition_point(|existing| existing.index <= failure.index);
        self.failures.insert(at, failure);
    }

    /// Number of failed files.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Whether no file failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Iterate failures in batch order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemFailure> {
        self.failures.iter()
    }

    /// Whether a file with this name failed.
    pub fn contains_name(&self, name: &str) -> bool {
        self.failures.iter().any(|f| f.name == name)
    }

    /// Whether every failure happened at `stage`.
    pub fn all_at(&self, stage: FailureStage) -> bool {
        !self.failures.is_empty() && self.failures.iter().all(|f| f.stage == stage)
    }
}

impl fmt::Display for FailureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FailureSet {}

impl From<FailureSet> for AppError {
    fn from(set: FailureSet) -> Self {
        let kind = if set.all_at(FailureStage::Validation) {
            ErrorKind::Validation
        } else if set.all_at(FailureStage::Cancelled) {
            ErrorKind::Cancelled
        } else {
            ErrorKind::Storage
        };
        let message = format!("{} file(s) failed to upload:\n{set}", set.len());
        AppError::with_source(kind, message, set)
    }
}

impl<'a> IntoIterator for &'a FailureSet {
    type Item = &'a ItemFailure;
    type IntoIter = std::slice::Iter<'a, ItemFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
