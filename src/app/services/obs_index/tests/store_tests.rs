//! SQLite-backed store tests

use chrono::{Duration, NaiveDate};
use tempfile::TempDir;

use super::{candidate, noon};
use crate::Error;
use crate::app::services::obs_index::{IndexStore, UpsertOutcome};

fn open_store(dir: &TempDir) -> IndexStore {
    IndexStore::open(&dir.path().join("synop_202105301200.sqlite")).unwrap()
}

#[test]
fn open_existing_rejects_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("synop_202105301200.sqlite");
    let result = IndexStore::open_existing(&missing);
    assert!(matches!(result, Err(Error::StoreMissing { .. })));
}

#[test]
fn first_sighting_is_inserted() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let outcome = store.upsert(&candidate("06007", "NNN", "/gts/a.bufr")).unwrap();
    assert_eq!(outcome, UpsertOutcome::Inserted);
    assert_eq!(store.record_count().unwrap(), 1);
}

#[test]
fn amendment_replaces_original() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store.upsert(&candidate("06007", "NNN", "/gts/a.bufr")).unwrap();
    let outcome = store.upsert(&candidate("06007", "CCA", "/gts/b.bufr")).unwrap();
    assert_eq!(outcome, UpsertOutcome::Replaced);

    let records = store.winning_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amendment, "CCA");
    assert_eq!(records[0].source_file.to_string_lossy(), "/gts/b.bufr");
}

#[test]
fn stored_amendment_retained_over_resent_original() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store.upsert(&candidate("06007", "CCB", "/gts/a.bufr")).unwrap();
    let outcome = store.upsert(&candidate("06007", "NNN", "/gts/b.bufr")).unwrap();
    assert_eq!(outcome, UpsertOutcome::Retained);

    let records = store.winning_records().unwrap();
    assert_eq!(records[0].amendment, "CCB");
    assert_eq!(records[0].source_file.to_string_lossy(), "/gts/a.bufr");
}

#[test]
fn distinct_stations_are_distinct_keys() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    store.upsert(&candidate("06007", "NNN", "/gts/a.bufr")).unwrap();
    store.upsert(&candidate("06008", "NNN", "/gts/a.bufr")).unwrap();
    assert_eq!(store.record_count().unwrap(), 2);
}

#[test]
fn replaying_the_same_files_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let batch = [
        candidate("06007", "NNN", "/gts/a.bufr"),
        candidate("06007", "CCA", "/gts/b.bufr"),
        candidate("06008", "NNN", "/gts/a.bufr"),
    ];
    for record in &batch {
        store.upsert(record).unwrap();
    }
    let first_pass = store.winning_records().unwrap();

    for record in &batch {
        let outcome = store.upsert(record).unwrap();
        assert_eq!(outcome, UpsertOutcome::Retained);
    }
    assert_eq!(store.winning_records().unwrap(), first_pass);
}

#[test]
fn window_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let cycle = NaiveDate::from_ymd_opt(2021, 5, 30)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap();

    let created = {
        let store = open_store(&dir);
        store.load_or_init_window(cycle, 60).unwrap()
    };
    assert_eq!(created.last_scanned_dir, "2021053019");

    let store = open_store(&dir);
    // A different cycle argument must not clobber the persisted window.
    let reloaded = store
        .load_or_init_window(cycle + Duration::hours(6), 60)
        .unwrap();
    assert_eq!(reloaded, created);
}

#[test]
fn progress_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let cycle = NaiveDate::from_ymd_opt(2021, 5, 30)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap();

    {
        let store = open_store(&dir);
        store.load_or_init_window(cycle, 60).unwrap();
        store.advance_progress("2021053021").unwrap();
    }

    let store = open_store(&dir);
    let window = store.load_or_init_window(cycle, 60).unwrap();
    assert_eq!(window.last_scanned_dir, "2021053021");
}

#[test]
fn cleanup_removes_only_records_before_cutoff() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let mut old = candidate("06007", "NNN", "/gts/a.bufr");
    old.bucket.timestamp = noon() - Duration::hours(2);
    store.upsert(&old).unwrap();
    store.upsert(&candidate("06008", "NNN", "/gts/b.bufr")).unwrap();

    let removed = store.cleanup_before(noon() - Duration::minutes(30)).unwrap();
    assert_eq!(removed, 1);

    let records = store.winning_records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].station_identity, "06008");
}

#[test]
fn duplicate_rows_under_one_key_are_fatal() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);
    store.upsert(&candidate("06007", "NNN", "/gts/a.bufr")).unwrap();

    // Break the uniqueness guarantee behind the store's back.
    let conn = store.connection();
    conn.execute_batch("DROP INDEX obs_identity").unwrap();
    conn.execute(
        "INSERT INTO observations
             (data_type, region, bulletin_number, origin_center,
              timestamp, amendment, station_id, source_file, subset)
         SELECT data_type, region, bulletin_number, origin_center,
                timestamp, amendment, station_id, source_file, subset
         FROM observations",
        [],
    )
    .unwrap();

    let result = store.upsert(&candidate("06007", "CCA", "/gts/b.bufr"));
    assert!(matches!(result, Err(Error::IndexConsistency { count: 2, .. })));
}
