//! Integration tests for batch upload orchestration.

mod helpers;

use std::collections::HashSet;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use uploadhub_core::config::UploadConfig;
use uploadhub_core::error::ErrorKind;
use uploadhub_core::types::FileUnit;
use uploadhub_service::{BatchUploader, FailureStage};

use helpers::{FaultyStore, config, numbered_units, sha256};

#[tokio::test]
async fn test_every_file_is_accounted_for() {
    let store = FaultyStore::new()
        .fail_put("f2.txt")
        .fail_resolve("f4.txt")
        .shared();
    let mut units = numbered_units(5);
    units.push(FileUnit::new("bad.txt", 100, "short"));

    let result = BatchUploader::new(store.clone(), config(2))
        .run(units, &CancellationToken::new())
        .await;

    assert_eq!(result.submitted(), 6);
    assert!(result.is_accounted());
    assert_eq!(result.outcomes.len(), 3);
    assert_eq!(result.failures.len(), 3);
}

#[tokio::test]
async fn test_one_failure_fails_the_whole_batch() {
    let store = FaultyStore::new().fail_put("f2.txt").shared();

    let failures = BatchUploader::new(store.clone(), config(4))
        .upload(numbered_units(3), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(failures.len(), 1);
    assert!(failures.contains_name("f2.txt"));
    assert!(
        failures
            .to_string()
            .contains("injected write failure for f2.txt")
    );
    assert!(store.inner.contains("f1.txt"));
    assert!(store.inner.contains("f3.txt"));
}

#[tokio::test]
async fn test_every_failure_message_is_reported() {
    let store = FaultyStore::new()
        .fail_put("f1.txt")
        .fail_resolve("f3.txt")
        .shared();

    let failures = BatchUploader::new(store, config(4))
        .upload(numbered_units(4), &CancellationToken::new())
        .await
        .unwrap_err();

    let text = failures.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("'f1.txt' failed at upload"));
    assert!(lines[1].contains("'f3.txt' failed at resolve"));
}

#[tokio::test]
async fn test_failure_is_isolated_to_its_file() {
    let store = FaultyStore::new().fail_put("f2.txt").shared();

    let result = BatchUploader::new(store.clone(), config(8))
        .run(numbered_units(5), &CancellationToken::new())
        .await;

    let failure = result.failures.iter().next().unwrap();
    assert_eq!(result.failures.len(), 1);
    assert_eq!(failure.index, 1);
    assert_eq!(failure.name, "f2.txt");
    assert_eq!(failure.stage, FailureStage::Upload);

    let names: Vec<&str> = result.outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["f1.txt", "f3.txt", "f4.txt", "f5.txt"]);
    for name in names {
        assert_eq!(store.puts(name), 1);
        assert_eq!(store.resolves(name), 1);
        assert!(store.inner.contains(name));
    }
    assert_eq!(store.resolves("f2.txt"), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_outcomes_never_mix_files() {
    let store = FaultyStore::new()
        .with_put_delay(Duration::from_millis(2))
        .shared();
    let units = numbered_units(50);
    let expected: Vec<(String, String)> = units
        .iter()
        .map(|u| (u.name.clone(), sha256(&u.bytes)))
        .collect();

    let outcomes = BatchUploader::new(store.clone(), config(8))
        .upload(units, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 50);
    for (outcome, (name, hash)) in outcomes.iter().zip(&expected) {
        assert_eq!(&outcome.name, name);
        assert_eq!(&outcome.content_hash, hash);
        assert_eq!(outcome.storage_location, format!("memory://{name}"));
        let stored = store.inner.get(name).unwrap();
        assert_eq!(&sha256(&stored.data), hash);
    }

    let ids: HashSet<_> = outcomes.iter().map(|o| o.unique_id).collect();
    assert_eq!(ids.len(), 50);
}

#[tokio::test]
async fn test_extension_and_mime_per_file() {
    let store = FaultyStore::new().shared();
    let units = vec![
        FileUnit::from_bytes("archive", "plain words"),
        FileUnit::from_bytes("a.b.tar.gz", b"\x1F\x8B\x08\x00".to_vec()),
        FileUnit::from_bytes("Photo.JPG", b"\xFF\xD8\xFF\xE0".to_vec()),
        FileUnit::from_bytes(".env", "KEY=value"),
    ];

    let outcomes = BatchUploader::new(store, config(4))
        .upload(units, &CancellationToken::new())
        .await
        .unwrap();

    let extensions: Vec<&str> = outcomes.iter().map(|o| o.extension.as_str()).collect();
    assert_eq!(extensions, ["", "gz", "jpg", ""]);
    assert_eq!(outcomes[0].mime, "text/plain; charset=utf-8");
    assert_eq!(outcomes[1].mime, "application/x-gzip");
    assert_eq!(outcomes[2].mime, "image/jpeg");
}

#[tokio::test]
async fn test_resolve_failure_removes_orphan_once() {
    let store = FaultyStore::new().fail_resolve("f3.txt").shared();

    let result = BatchUploader::new(store.clone(), config(4))
        .run(numbered_units(3), &CancellationToken::new())
        .await;

    let failure = result.failures.iter().next().unwrap();
    assert_eq!(failure.stage, FailureStage::Resolve);
    assert_eq!(store.puts("f3.txt"), 1);
    assert_eq!(store.resolves("f3.txt"), 1);
    assert_eq!(store.deletes("f3.txt"), 1);
    assert!(!store.inner.contains("f3.txt"));
    assert_eq!(store.deletes("f1.txt"), 0);
}

#[tokio::test]
async fn test_failed_orphan_removal_is_reported() {
    let store = FaultyStore::new()
        .fail_resolve("f1.txt")
        .fail_delete("f1.txt")
        .shared();

    let failures = BatchUploader::new(store.clone(), config(2))
        .upload(numbered_units(1), &CancellationToken::new())
        .await
        .unwrap_err();

    let failure = failures.iter().next().unwrap();
    assert_eq!(failure.stage, FailureStage::Resolve);
    assert!(failure.error.message.contains("injected resolve failure for f1.txt"));
    assert!(failure.error.message.contains("could not be removed"));
    assert!(failures.to_string().contains("injected delete failure for f1.txt"));
    assert_eq!(store.deletes("f1.txt"), 1);
    assert!(store.inner.contains("f1.txt"));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_while_resolving_removes_orphan() {
    let store = FaultyStore::new()
        .with_resolve_delay(Duration::from_secs(60))
        .shared();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = BatchUploader::new(store.clone(), config(2))
        .run(numbered_units(1), &cancel)
        .await;

    let failure = result.failures.iter().next().unwrap();
    assert_eq!(failure.stage, FailureStage::Cancelled);
    assert_eq!(store.puts("f1.txt"), 1);
    assert_eq!(store.resolves("f1.txt"), 1);
    assert_eq!(store.deletes("f1.txt"), 1);
    assert!(!store.inner.contains("f1.txt"));
}

#[tokio::test]
async fn test_orphan_kept_when_cleanup_disabled() {
    let store = FaultyStore::new().fail_resolve("f1.txt").shared();
    let config = UploadConfig {
        cleanup_orphans: false,
        ..UploadConfig::default()
    };

    let result = BatchUploader::new(store.clone(), config)
        .run(numbered_units(1), &CancellationToken::new())
        .await;

    assert_eq!(result.failures.len(), 1);
    assert_eq!(store.deletes("f1.txt"), 0);
    assert!(store.inner.contains("f1.txt"));
}

#[tokio::test]
async fn test_concurrency_ceiling_is_respected() {
    let store = FaultyStore::new()
        .with_put_delay(Duration::from_millis(20))
        .shared();

    let outcomes = BatchUploader::new(store.clone(), config(3))
        .upload(numbered_units(12), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 12);
    assert!(store.max_in_flight() <= 3);
    assert!(store.max_in_flight() >= 2);
}

#[tokio::test]
async fn test_concurrency_of_one_serializes_writes() {
    let store = FaultyStore::new()
        .with_put_delay(Duration::from_millis(5))
        .shared();

    BatchUploader::new(store.clone(), config(1))
        .upload(numbered_units(4), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(store.max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_reports_every_unfinished_file() {
    let store = FaultyStore::new()
        .with_put_delay(Duration::from_secs(60))
        .shared();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = BatchUploader::new(store.clone(), config(2))
        .run(numbered_units(5), &cancel)
        .await;

    assert!(result.is_accounted());
    assert!(result.outcomes.is_empty());
    assert_eq!(result.failures.len(), 5);
    assert!(result.failures.all_at(FailureStage::Cancelled));
    assert!(
        result
            .failures
            .iter()
            .all(|f| f.error.kind == ErrorKind::Cancelled)
    );
    assert!(store.inner.is_empty());
    assert_eq!(store.total_puts(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_batch_timeout_cancels_slow_uploads() {
    let store = FaultyStore::new()
        .with_put_delay(Duration::from_secs(600))
        .shared();
    let config = UploadConfig {
        batch_timeout_seconds: 1,
        ..UploadConfig::default()
    };

    let result = BatchUploader::new(store.clone(), config)
        .run(numbered_units(3), &CancellationToken::new())
        .await;

    assert_eq!(result.failures.len(), 3);
    assert!(result.failures.all_at(FailureStage::Cancelled));
}

#[tokio::test]
async fn test_invalid_units_never_reach_the_store() {
    let store = FaultyStore::new().shared();
    let units = vec![
        FileUnit::new("short.txt", 10, "abc"),
        FileUnit::new("negative.txt", -5, ""),
        FileUnit::from_bytes("", "no name"),
    ];

    let failures = BatchUploader::new(store.clone(), config(4))
        .upload(units, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(failures.len(), 3);
    assert!(failures.all_at(FailureStage::Validation));
    assert_eq!(store.total_puts(), 0);
}

#[tokio::test]
async fn test_panicking_task_becomes_a_failure() {
    let store = FaultyStore::new().panic_put("f2.txt").shared();

    let result = BatchUploader::new(store.clone(), config(4))
        .run(numbered_units(3), &CancellationToken::new())
        .await;

    assert!(result.is_accounted());
    assert_eq!(result.outcomes.len(), 2);
    let failure = result.failures.iter().next().unwrap();
    assert_eq!(failure.name, "f2.txt");
    assert_eq!(failure.stage, FailureStage::Panicked);
}

#[tokio::test]
async fn test_duplicate_names_share_one_key() {
    let store = FaultyStore::new().shared();
    let units = vec![
        FileUnit::from_bytes("same.txt", "first"),
        FileUnit::from_bytes("same.txt", "second"),
    ];

    let outcomes = BatchUploader::new(store.clone(), config(1))
        .upload(units, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_ne!(outcomes[0].unique_id, outcomes[1].unique_id);
    assert_eq!(store.puts("same.txt"), 2);
    assert_eq!(store.inner.len(), 1);
}
