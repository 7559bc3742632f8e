// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn store() -> (tempfile::TempDir, ArtifactStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("artifacts"));
    (dir, store)
}

#[test]
fn save_and_read_answer_roundtrip() {
    let (_dir, store) = store();
    let id = JobId::from_string("job-a");
    store.save_answer(&id, "[global]\nfqdn = \"x.y\"\n").unwrap();
    assert_eq!(store.read_answer(&id).unwrap(), "[global]\nfqdn = \"x.y\"\n");
}

#[test]
fn read_missing_answer_is_not_found() {
    let (_dir, store) = store();
    let id = JobId::from_string("job-a");
    assert!(matches!(store.read_answer(&id), Err(StoreError::NotFound(_))));
}

#[test]
fn finalize_requires_iso_present() {
    let (_dir, store) = store();
    let id = JobId::from_string("job-a");
    store.save_answer(&id, "x").unwrap();
    assert!(matches!(store.finalize(&id), Err(StoreError::NotFound(_))));

    std::fs::write(store.iso_path(&id), b"iso-bytes").unwrap();
    assert_eq!(store.finalize(&id).unwrap(), store.iso_path(&id));
}

#[test]
fn delete_removes_directory_and_is_idempotent() {
    let (_dir, store) = store();
    let id = JobId::from_string("job-a");
    store.save_answer(&id, "x").unwrap();
    assert!(store.job_dir(&id).exists());

    store.delete(&id).unwrap();
    assert!(!store.job_dir(&id).exists());
    store.delete(&id).unwrap();
}

#[test]
fn jobs_do_not_share_directories() {
    let (_dir, store) = store();
    let a = JobId::from_string("job-a");
    let b = JobId::from_string("job-b");
    store.save_answer(&a, "a").unwrap();
    store.save_answer(&b, "b").unwrap();
    store.delete(&a).unwrap();
    assert_eq!(store.read_answer(&b).unwrap(), "b");
}
