//! Tests for the bulletin intake pipeline
//!
//! Shared fixtures plus per-component test modules.

pub mod header_tests;
pub mod intake_tests;

use chrono::{NaiveDate, NaiveDateTime};

use crate::app::adapters::codec::mock::{MockBulletin, MockCodec};
use crate::app::models::GtsHeader;

/// Build a naive timestamp.
pub fn dt(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// A valid in-scope SYNOP header for 30th 12:00Z.
pub fn synop_header() -> GtsHeader {
    GtsHeader {
        data_type: "IS".into(),
        region: "NA".into(),
        bulletin_number: "99".into(),
        origin_center: "EGRR".into(),
        day: "30".into(),
        hour: "12".into(),
        minute: "00".into(),
        amendment: "NNN".into(),
    }
}

/// Codec scripted to decode a single-message file with the given bulletin.
pub fn codec_with(header: Option<GtsHeader>, bulletin: MockBulletin) -> MockCodec {
    MockCodec {
        header,
        message_count: 1,
        bulletin: Some(bulletin),
    }
}
