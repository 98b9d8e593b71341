//! Object store trait for pluggable blob storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Content disposition applied to every stored object.
pub const CONTENT_DISPOSITION: &str = "attachment";

/// Trait for object storage backends.
///
/// Implementations exist in `uploadhub-storage` for S3, the local
/// filesystem, and process memory. A single instance is shared by every
/// concurrent upload task, so implementations must hold no per-call state.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "local").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write an object privately with server-side encryption.
    ///
    /// Re-writing an existing key replaces it. Implementations never retry.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Build the retrieval location of an object previously written by
    /// [`ObjectStore::put`]. The object does not need to be public.
    async fn resolve_location(&self, key: &str) -> AppResult<String>;

    /// Remove an object. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;
}
