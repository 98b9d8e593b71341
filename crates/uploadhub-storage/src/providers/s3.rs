//! S3-compatible object store (requires the `s3` feature).

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{ObjectCannedAcl, ServerSideEncryption};
use bytes::Bytes;
use tracing::{debug, info};

use uploadhub_core::config::S3StorageConfig;
use uploadhub_core::error::AppError;
use uploadhub_core::result::AppResult;
use uploadhub_core::traits::object_store::{CONTENT_DISPOSITION, ObjectStore};

use crate::location::unsigned_object_url;

/// S3-compatible object store.
///
/// Objects are written with a private ACL, AES256 server-side encryption,
/// and an `attachment` content disposition.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
    endpoint: String,
    force_path_style: bool,
    presign_expiry: Option<Duration>,
}

impl S3ObjectStore {
    /// Create a new S3 object store from configuration.
    ///
    /// Static credentials are used when an access key is configured;
    /// otherwise the default AWS credential chain is consulted.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must be set"));
        }

        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 object store"
        );

        let region = Region::new(config.region.clone());
        let mut builder = if config.access_key.is_empty() {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            aws_sdk_s3::config::Builder::from(&shared)
        } else {
            let credentials = Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "uploadhub-config",
            );
            aws_sdk_s3::config::Builder::new()
                .behavior_version(BehaviorVersion::latest())
                .region(region)
                .credentials_provider(credentials)
        };

        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(config.endpoint.clone());
        }
        builder = builder.force_path_style(config.force_path_style);

        Ok(Self::with_client(Client::from_conf(builder.build()), config))
    }

    /// Wrap an already configured client.
    pub fn with_client(client: Client, config: &S3StorageConfig) -> Self {
        let presign_expiry = (config.presign_expiry_seconds > 0)
            .then(|| Duration::from_secs(config.presign_expiry_seconds));

        Self {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
            force_path_style: config.force_path_style,
            presign_expiry,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                debug!(bucket = %self.bucket, error = %DisplayErrorContext(&e), "S3 health check failed");
                Ok(false)
            }
        }
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let length = data.len() as i64;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::Private)
            .body(ByteStream::from(data))
            .content_length(length)
            .content_type(content_type)
            .content_disposition(CONTENT_DISPOSITION)
            .server_side_encryption(ServerSideEncryption::Aes256)
            .send()
            .await
            .map_err(|e| {
                AppError::storage(format!(
                    "S3 put of '{key}' failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(bucket = %self.bucket, key, bytes = length, "Put S3 object");
        Ok(())
    }

    async fn resolve_location(&self, key: &str) -> AppResult<String> {
        let Some(expiry) = self.presign_expiry else {
            return Ok(unsigned_object_url(
                &self.endpoint,
                &self.region,
                &self.bucket,
                key,
                self.force_path_style,
            ));
        };

        let presigning = PresigningConfig::expires_in(expiry).map_err(|e| {
            AppError::configuration(format!("Invalid presign expiry for '{key}': {e}"))
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::storage(format!(
                    "Failed to presign location of '{key}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(request.uri().to_string())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::storage(format!(
                    "S3 delete of '{key}' failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}
