//! # uploadhub-service
//!
//! The multi-file upload pipeline. A batch of [`FileUnit`]s is classified,
//! written to an [`ObjectStore`] by concurrently scheduled tasks, and folded
//! into either an ordered list of outcomes or a [`FailureSet`] naming every
//! file that failed. [`UploadService`] sits on top and hands successful
//! outcomes to the [`MetadataLedger`].
//!
//! [`FileUnit`]: uploadhub_core::types::FileUnit
//! [`ObjectStore`]: uploadhub_core::traits::ObjectStore
//! [`MetadataLedger`]: uploadhub_core::traits::MetadataLedger

pub mod upload;

pub use upload::{
    BatchResult, BatchUploader, Classification, FailureSet, FailureStage, ItemFailure,
    UploadService, classify,
};
