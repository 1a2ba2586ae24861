//! Tests for header resolution

use super::*;
use crate::app::adapters::codec::mock::MockCodec;
use crate::app::services::bulletin_intake::header::{header_from_filename, resolve_header};
use std::path::Path;

#[test]
fn long_filename_yields_full_header() {
    let header = header_from_filename(Path::new("ISAB99_EGRR_301200_CCA")).unwrap();
    assert_eq!(header.data_type, "IS");
    assert_eq!(header.region, "AB");
    assert_eq!(header.bulletin_number, "99");
    assert_eq!(header.origin_center, "EGRR");
    assert_eq!(header.day, "30");
    assert_eq!(header.hour, "12");
    assert_eq!(header.minute, "00");
    assert_eq!(header.amendment, "CCA");
}

#[test]
fn short_filename_defaults_amendment_to_nil() {
    let header = header_from_filename(Path::new("ISAB99_EGRR_301200")).unwrap();
    assert_eq!(header.amendment, "NNN");
    assert!(header.is_original());
}

#[test]
fn filename_length_must_be_exact() {
    // 17 characters
    assert!(header_from_filename(Path::new("ISAB9_EGRR_301200")).is_none());
    // 19 characters
    assert!(header_from_filename(Path::new("ISAB99_EGRR_3012000")).is_none());
    assert!(header_from_filename(Path::new("")).is_none());
}

#[test]
fn misplaced_separators_are_rejected() {
    assert!(header_from_filename(Path::new("ISAB99-EGRR_301200")).is_none());
    assert!(header_from_filename(Path::new("ISAB99_EGRR-301200")).is_none());
    assert!(header_from_filename(Path::new("ISAB99_EGRR_301200-CCA")).is_none());
}

#[test]
fn directory_part_is_ignored() {
    let header =
        header_from_filename(Path::new("/gts/2021053012/ISAB99_EGRR_301200_CCA")).unwrap();
    assert_eq!(header.origin_center, "EGRR");
}

#[test]
fn embedded_metadata_wins_over_filename() {
    let mut embedded = synop_header();
    embedded.origin_center = "LFPW".into();
    let codec = MockCodec {
        header: Some(embedded),
        ..Default::default()
    };
    let header = resolve_header(&codec, b"", Path::new("ISAB99_EGRR_301200")).unwrap();
    assert_eq!(header.origin_center, "LFPW");
}

#[test]
fn falls_back_to_filename_when_codec_finds_no_envelope() {
    let codec = MockCodec::default();
    let header = resolve_header(&codec, b"", Path::new("ISAB99_EGRR_301200")).unwrap();
    assert_eq!(header.origin_center, "EGRR");

    assert!(resolve_header(&codec, b"", Path::new("not-a-gts-name")).is_none());
}
