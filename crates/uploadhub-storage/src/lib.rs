//! # uploadhub-storage
//!
//! Object store adapters for UploadHub. Supports S3-compatible object stores
//! (feature `s3`), the local filesystem, and an in-process memory store.

pub mod factory;
pub mod location;
pub mod providers;

pub use factory::build_object_store;
pub use providers::{LocalObjectStore, MemoryObjectStore};
#[cfg(feature = "s3")]
pub use providers::S3ObjectStore;
