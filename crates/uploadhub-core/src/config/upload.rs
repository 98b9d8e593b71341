//! Batch upload pipeline configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the concurrent batch upload orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum number of upload tasks allowed in flight at once.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Whole-batch deadline in seconds (0 disables the deadline).
    #[serde(default = "default_batch_timeout")]
    pub batch_timeout_seconds: u64,
    /// Delete an object whose retrieval location could not be resolved.
    #[serde(default = "default_true")]
    pub cleanup_orphans: bool,
    /// Prefix prepended to every object key.
    #[serde(default)]
    pub key_prefix: String,
}

impl UploadConfig {
    /// The effective concurrency ceiling (never below one).
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    /// The batch deadline, if one is configured.
    pub fn batch_timeout(&self) -> Option<Duration> {
        (self.batch_timeout_seconds > 0).then(|| Duration::from_secs(self.batch_timeout_seconds))
    }

    /// Build the object key for a file name.
    pub fn object_key(&self, name: &str) -> String {
        if self.key_prefix.is_empty() {
            return name.to_string();
        }
        format!("{}/{}", self.key_prefix.trim_end_matches('/'), name)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            batch_timeout_seconds: default_batch_timeout(),
            cleanup_orphans: true,
            key_prefix: String::new(),
        }
    }
}

fn default_max_concurrency() -> usize {
    8
}

fn default_batch_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}
