//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Object store provider: `"s3"`, `"local"`, or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            s3: S3StorageConfig::default(),
            local: LocalStorageConfig::default(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// Endpoint URL for non-AWS services such as MinIO (empty = AWS).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Bucket receiving uploaded objects.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID (empty = default AWS credential chain).
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Use path-style addressing (`endpoint/bucket/key`).
    #[serde(default)]
    pub force_path_style: bool,
    /// Lifetime of presigned retrieval URLs in seconds; 0 builds unsigned URLs.
    #[serde(default = "default_presign_expiry")]
    pub presign_expiry_seconds: u64,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            force_path_style: false,
            presign_expiry_seconds: default_presign_expiry(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for stored objects.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_presign_expiry() -> u64 {
    3600
}

fn default_local_root() -> String {
    "./data/objects".to_string()
}
