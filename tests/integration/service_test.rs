//! Integration tests for the upload service and metadata ledger.

mod helpers;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use uploadhub_core::config::StorageConfig;
use uploadhub_core::error::ErrorKind;
use uploadhub_core::types::FileUnit;
use uploadhub_database::InMemoryLedger;
use uploadhub_service::UploadService;
use uploadhub_storage::build_object_store;

use helpers::{FaultyStore, config, numbered_units, sha256};

#[tokio::test]
async fn test_successful_batch_is_recorded_in_order() {
    let store = FaultyStore::new().shared();
    let ledger = InMemoryLedger::new();
    let service = UploadService::new(store.clone(), Arc::new(ledger.clone()), config(4));

    let units = numbered_units(4);
    let hashes: Vec<String> = units.iter().map(|u| sha256(&u.bytes)).collect();
    let persisted = service
        .upload_all(units, &CancellationToken::new())
        .await
        .unwrap();

    let records = service.list_uploads().await.unwrap();
    assert_eq!(records.len(), 4);
    for ((record, persisted), hash) in records.iter().zip(&persisted).zip(&hashes) {
        assert_eq!(record.record_id, persisted.record_id);
        assert_eq!(record.outcome, persisted.outcome);
        assert_eq!(&record.outcome.content_hash, hash);
    }
}

#[tokio::test]
async fn test_failed_batch_records_nothing() {
    let store = FaultyStore::new().fail_resolve("f3.txt").shared();
    let ledger = InMemoryLedger::new();
    let service = UploadService::new(store, Arc::new(ledger.clone()), config(4));

    let err = service
        .upload_all(numbered_units(3), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Storage);
    assert!(err.message.starts_with("1 file(s) failed to upload:"));
    assert!(err.message.contains("'f3.txt' failed at resolve"));
    assert_eq!(ledger.len().await, 0);
}

#[tokio::test]
async fn test_cancelled_batch_maps_to_cancelled_error() {
    let store = FaultyStore::new().shared();
    let ledger = InMemoryLedger::new();
    let service = UploadService::new(store.clone(), Arc::new(ledger.clone()), config(2));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = service
        .upload_all(numbered_units(2), &cancel)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Cancelled);
    assert_eq!(store.total_puts(), 0);
    assert_eq!(ledger.len().await, 0);
}

#[tokio::test]
async fn test_local_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = StorageConfig::default();
    storage.local.root_path = dir.path().display().to_string();
    let store = build_object_store(&storage).await.unwrap();
    let service = UploadService::new(store, Arc::new(InMemoryLedger::new()), config(2));

    let persisted = service
        .upload_one(
            FileUnit::from_bytes("report.pdf", "%PDF-1.7 body"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(persisted.outcome.mime, "application/pdf");
    assert_eq!(persisted.outcome.extension, "pdf");
    assert!(persisted.outcome.storage_location.starts_with("file://"));
    let on_disk = std::fs::read(dir.path().join("report.pdf")).unwrap();
    assert_eq!(on_disk, b"%PDF-1.7 body");
}
