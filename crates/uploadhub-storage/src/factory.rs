//! Build the configured object store.

use std::sync::Arc;

use tracing::info;

use uploadhub_core::config::StorageConfig;
use uploadhub_core::error::AppError;
use uploadhub_core::result::AppResult;
use uploadhub_core::traits::object_store::ObjectStore;

use crate::providers::{LocalObjectStore, MemoryObjectStore};

/// Instantiate the object store selected by `storage.provider`.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.provider.as_str() {
        "local" => Arc::new(LocalObjectStore::new(&config.local.root_path).await?),
        "memory" => Arc::new(MemoryObjectStore::new()),
        #[cfg(feature = "s3")]
        "s3" => Arc::new(crate::providers::S3ObjectStore::new(&config.s3).await?),
        #[cfg(not(feature = "s3"))]
        "s3" => {
            return Err(AppError::configuration(
                "S3 storage requested but uploadhub-storage was built without the `s3` feature",
            ));
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider: {other}"
            )));
        }
    };

    info!(provider = store.provider_type(), "Object store initialized");
    Ok(store)
}
