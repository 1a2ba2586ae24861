//! Tests for the priority/dedup index
//!
//! Shared fixtures plus per-component test modules.

pub mod priority_tests;
pub mod store_tests;

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::app::models::{GtsHeader, ObservationRecord};

/// Timestamp used by every fixture record.
pub fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 5, 30)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Candidate record for station `station` carrying amendment tag `tag`,
/// sourced from `file`.
pub fn candidate(station: &str, tag: &str, file: &str) -> ObservationRecord {
    let header = GtsHeader {
        data_type: "IS".into(),
        region: "NA".into(),
        bulletin_number: "99".into(),
        origin_center: "EGRR".into(),
        day: "30".into(),
        hour: "12".into(),
        minute: "00".into(),
        amendment: tag.to_string(),
    };
    ObservationRecord {
        bucket: header.bucket(noon()),
        amendment: tag.to_string(),
        station_identity: station.to_string(),
        source_file: Path::new(file).to_path_buf(),
        subset: 1,
    }
}
