//! In-process object store backed by a concurrent map.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;

use uploadhub_core::error::AppError;
use uploadhub_core::result::AppResult;
use uploadhub_core::traits::object_store::ObjectStore;

/// An object held by [`MemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object contents.
    pub data: Bytes,
    /// Content type supplied at write time.
    pub content_type: String,
}

/// Object store keeping objects in memory. Locations are `memory://{key}`.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<DashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    /// Create an empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored object.
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    /// Whether an object exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        debug!(key, bytes = data.len(), content_type, "Stored object in memory");
        self.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn resolve_location(&self, key: &str) -> AppResult<String> {
        if !self.objects.contains_key(key) {
            return Err(AppError::not_found(format!("Object not found: {key}")));
        }
        Ok(format!("memory://{key}"))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.remove(key);
        Ok(())
    }
}
