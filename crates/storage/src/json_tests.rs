// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chores_core::{ChoreDef, Kid, KidId};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

fn household() -> Household {
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
    let mut household = Household::default();
    household.upsert_kid(Kid::new("ada", "Ada"));
    let mut chore = ChoreDef::new("dishes", "Dishes");
    chore.assigned_kids = vec![KidId::from("ada")];
    chore.due_date = Some(now);
    household.upsert_chore(chore, now);
    household
}

#[test]
fn missing_file_loads_empty() {
    let tmp = TempDir::new().unwrap();
    let store = JsonStore::open(tmp.path().join("state/household.json")).unwrap();
    assert_eq!(store.load().unwrap(), Household::default());
}

#[test]
fn save_then_load() {
    let tmp = TempDir::new().unwrap();
    let store = JsonStore::open(tmp.path().join("household.json")).unwrap();

    store.save(&household()).unwrap();

    assert_eq!(store.load().unwrap(), household());
    assert!(!store.temp_path().exists());
}

#[test]
fn save_replaces_previous_snapshot() {
    let tmp = TempDir::new().unwrap();
    let store = JsonStore::open(tmp.path().join("household.json")).unwrap();
    store.save(&household()).unwrap();

    store.save(&Household::default()).unwrap();

    assert!(store.load().unwrap().chores.is_empty());
}

#[test]
fn corrupt_snapshot_is_a_json_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("household.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonStore::open(&path).unwrap();
    assert!(matches!(store.load(), Err(StorageError::Json(_))));
}

#[test]
fn memory_store_counts_saves() {
    let store = crate::MemoryStore::new();
    store.save(&household()).unwrap();
    store.save(&household()).unwrap();

    assert_eq!(store.save_count(), 2);
    assert_eq!(store.load().unwrap(), household());
}
