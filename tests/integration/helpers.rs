//! Shared test helpers for upload pipeline integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use sha2::{Digest, Sha256};

use uploadhub_core::config::UploadConfig;
use uploadhub_core::error::AppError;
use uploadhub_core::result::AppResult;
use uploadhub_core::traits::object_store::ObjectStore;
use uploadhub_core::types::FileUnit;
use uploadhub_storage::MemoryObjectStore;

/// Object store wrapping [`MemoryObjectStore`] that injects failures by key
/// and counts every call.
#[derive(Debug, Default)]
pub struct FaultyStore {
    /// The store holding successfully written objects.
    pub inner: MemoryObjectStore,
    fail_put: HashSet<String>,
    fail_resolve: HashSet<String>,
    fail_delete: HashSet<String>,
    panic_put: HashSet<String>,
    put_delay: Option<Duration>,
    resolve_delay: Option<Duration>,
    puts: DashMap<String, usize>,
    resolves: DashMap<String, usize>,
    deletes: DashMap<String, usize>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FaultyStore {
    /// A store that never fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every write to `key`.
    pub fn fail_put(mut self, key: &str) -> Self {
        self.fail_put.insert(key.to_string());
        self
    }

    /// Fail every location lookup for `key`.
    pub fn fail_resolve(mut self, key: &str) -> Self {
        self.fail_resolve.insert(key.to_string());
        self
    }

    /// Fail every delete of `key`.
    pub fn fail_delete(mut self, key: &str) -> Self {
        self.fail_delete.insert(key.to_string());
        self
    }

    /// Panic while writing `key`.
    pub fn panic_put(mut self, key: &str) -> Self {
        self.panic_put.insert(key.to_string());
        self
    }

    /// Hold every write for `delay` before storing it.
    pub fn with_put_delay(mut self, delay: Duration) -> Self {
        self.put_delay = Some(delay);
        self
    }

    /// Hold every location lookup for `delay`.
    pub fn with_resolve_delay(mut self, delay: Duration) -> Self {
        self.resolve_delay = Some(delay);
        self
    }

    /// Wrap for handing to the pipeline.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Writes attempted for `key`.
    pub fn puts(&self, key: &str) -> usize {
        count(&self.puts, key)
    }

    /// Location lookups attempted for `key`.
    pub fn resolves(&self, key: &str) -> usize {
        count(&self.resolves, key)
    }

    /// Deletes issued for `key`.
    pub fn deletes(&self, key: &str) -> usize {
        count(&self.deletes, key)
    }

    /// Writes attempted across all keys.
    pub fn total_puts(&self) -> usize {
        self.puts.iter().map(|e| *e.value()).sum()
    }

    /// Highest number of writes observed in progress at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

fn count(map: &DashMap<String, usize>, key: &str) -> usize {
    map.get(key).map(|e| *e.value()).unwrap_or(0)
}

fn bump(map: &DashMap<String, usize>, key: &str) {
    *map.entry(key.to_string()).or_insert(0) += 1;
}

/// Decrements the in-flight counter even when a write is dropped midway.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for FaultyStore {
    fn provider_type(&self) -> &str {
        "faulty"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        bump(&self.puts, key);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(delay) = self.put_delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_put.contains(key) {
            panic!("injected panic writing {key}");
        }
        if self.fail_put.contains(key) {
            return Err(AppError::storage(format!("injected write failure for {key}")));
        }
        self.inner.put(key, data, content_type).await
    }

    async fn resolve_location(&self, key: &str) -> AppResult<String> {
        bump(&self.resolves, key);
        if let Some(delay) = self.resolve_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_resolve.contains(key) {
            return Err(AppError::storage(format!("injected resolve failure for {key}")));
        }
        self.inner.resolve_location(key).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        bump(&self.deletes, key);
        if self.fail_delete.contains(key) {
            return Err(AppError::storage(format!("injected delete failure for {key}")));
        }
        self.inner.delete(key).await
    }
}

/// Upload settings with the given concurrency ceiling.
pub fn config(max_concurrency: usize) -> UploadConfig {
    UploadConfig {
        max_concurrency,
        ..UploadConfig::default()
    }
}

/// Units named `f1.txt` through `f{n}.txt` with distinct contents.
pub fn numbered_units(n: usize) -> Vec<FileUnit> {
    (1..=n)
        .map(|i| FileUnit::from_bytes(format!("f{i}.txt"), format!("payload number {i}")))
        .collect()
}

/// Hex SHA-256, computed independently of the pipeline.
pub fn sha256(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
