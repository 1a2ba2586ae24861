//! End-to-end tests for the intake pipeline

use super::*;
use crate::app::adapters::codec::FieldValue;
use crate::app::adapters::codec::mock::{MockBulletin, MockCodec};
use crate::app::models::CycleWindow;
use crate::app::services::bulletin_intake::parse_file;
use crate::constants::bufr_keys;
use std::fs;

fn window_for_noon() -> CycleWindow {
    CycleWindow::for_cycle(dt(2021, 5, 30, 12, 0), 60)
}

fn station_bulletin() -> MockBulletin {
    MockBulletin::new(1, false)
        .with_field(bufr_keys::BLOCK_NUMBER, FieldValue::Integer(6))
        .with_field(bufr_keys::STATION_NUMBER, FieldValue::Integer(7))
}

#[test]
fn admitted_file_yields_records_keyed_by_header_and_station() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("ISNA99_EGRR_301200_CCA");
    fs::write(&path, b"payload").unwrap();

    // No embedded envelope: header comes from the filename.
    let codec = codec_with(None, station_bulletin());
    let bulletin = parse_file(&codec, &path, &window_for_noon()).unwrap();

    assert_eq!(bulletin.header.amendment, "CCA");
    assert_eq!(bulletin.timestamp, dt(2021, 5, 30, 12, 0));
    assert_eq!(bulletin.labels.len(), 1);

    let records = bulletin.records(&path);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].station_identity, "06007");
    assert_eq!(records[0].amendment, "CCA");
    assert_eq!(records[0].subset, 1);
    assert_eq!(records[0].source_file, path);
    assert_eq!(records[0].bucket.timestamp_key(), "20210530-120000");
}

#[test]
fn out_of_window_bulletins_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    // 14:00Z is outside the 11:31..12:30 window.
    let path = tmp.path().join("ISNA99_EGRR_301400");
    fs::write(&path, b"payload").unwrap();

    let codec = codec_with(None, station_bulletin());
    assert!(parse_file(&codec, &path, &window_for_noon()).is_none());
}

#[test]
fn out_of_scope_bulletins_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    // Region second letter 'B' is outside the coverage allow-list.
    let path = tmp.path().join("ISAB99_EGRR_301200");
    fs::write(&path, b"payload").unwrap();

    let codec = codec_with(None, station_bulletin());
    assert!(parse_file(&codec, &path, &window_for_noon()).is_none());
}

#[test]
fn unresolvable_headers_and_dates_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();

    let bad_name = tmp.path().join("random-file.txt");
    fs::write(&bad_name, b"payload").unwrap();
    let codec = codec_with(None, station_bulletin());
    assert!(parse_file(&codec, &bad_name, &window_for_noon()).is_none());

    let bad_date = tmp.path().join("ISNA99_EGRR_991200");
    fs::write(&bad_date, b"payload").unwrap();
    assert!(parse_file(&codec, &bad_date, &window_for_noon()).is_none());
}

#[test]
fn unreadable_files_are_skipped_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("ISNA99_EGRR_301200");
    let codec = codec_with(None, station_bulletin());
    assert!(parse_file(&codec, &missing, &window_for_noon()).is_none());
}

#[test]
fn embedded_header_takes_precedence_for_admission() {
    let tmp = tempfile::tempdir().unwrap();
    // Filename would be rejected; the embedded envelope is in scope.
    let path = tmp.path().join("arbitrary-local-name");
    fs::write(&path, b"payload").unwrap();

    let codec = MockCodec {
        header: Some(synop_header()),
        message_count: 1,
        bulletin: Some(station_bulletin()),
    };
    let bulletin = parse_file(&codec, &path, &window_for_noon()).unwrap();
    assert_eq!(bulletin.header.region, "NA");
}
