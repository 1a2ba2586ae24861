//! Observation subset labeling
//!
//! Owns the labeling policy for the subsets of a decoded bulletin; the
//! decoding itself stays behind the codec seam. The nominal date/time fields
//! are constant across a bulletin and read once; position fields are read once
//! and broadcast when the data is compressed or single-subset, per subset
//! otherwise. The station identity concatenates, in fixed priority order,
//! every identifier field the bulletin's schema defines, with field-specific
//! zero padding (block 2 digits, station 3, buoy 5). A subset exposing no
//! identifier at all keeps the empty identity and is still indexed.
//!
//! Unsupported file shapes are rejected outright: zero decodable bulletins,
//! or more than one bulletin in the same physical file (the outer GTS header
//! describes exactly one).

use tracing::debug;

use crate::app::adapters::codec::{BufrCodec, Bulletin, FieldValue};
use crate::app::models::SubsetLabel;
use crate::constants::{STATION_ID_FIELDS, bufr_keys};

/// Label every subset of the single bulletin in `raw`.
///
/// Returns `None` when the file shape is unsupported or nothing decodes.
pub fn label_subsets(codec: &dyn BufrCodec, raw: &[u8]) -> Option<Vec<SubsetLabel>> {
    match codec.count_messages(raw) {
        0 => {
            debug!("no valid BUFR message");
            return None;
        }
        1 => {}
        n => {
            debug!("unsupported file shape: {} BUFR messages", n);
            return None;
        }
    }

    let bulletin = codec.decode_bulletin(raw)?;
    let count = bulletin.subset_count();
    if count == 0 {
        debug!("bulletin has zero subsets");
        return None;
    }

    let typical_date = bulletin
        .field(bufr_keys::TYPICAL_DATE)
        .and_then(|v| v.as_text().map(str::to_string));
    let typical_time = bulletin
        .field(bufr_keys::TYPICAL_TIME)
        .and_then(|v| v.as_text().map(str::to_string));
    let latitudes = position_values(bulletin.as_ref(), bufr_keys::LATITUDE, count);
    let longitudes = position_values(bulletin.as_ref(), bufr_keys::LONGITUDE, count);
    let identities = station_identities(bulletin.as_ref(), count);

    Some(
        (0..count)
            .map(|i| SubsetLabel {
                subset: i + 1,
                typical_date: typical_date.clone(),
                typical_time: typical_time.clone(),
                latitude: latitudes[i],
                longitude: longitudes[i],
                station_identity: identities[i].clone(),
            })
            .collect(),
    )
}

/// Read a position field, broadcasting a shared value when the data is
/// compressed or single-subset.
fn position_values(bulletin: &dyn Bulletin, key: &str, count: usize) -> Vec<Option<f64>> {
    if bulletin.is_compressed() || count == 1 {
        match bulletin.field(key) {
            Some(FieldValue::FloatArray(values)) if values.len() == count => {
                values.into_iter().map(Some).collect()
            }
            Some(FieldValue::IntegerArray(values)) if values.len() == count => {
                values.into_iter().map(|v| Some(v as f64)).collect()
            }
            Some(value) => vec![value.as_f64(); count],
            None => vec![None; count],
        }
    } else {
        (1..=count)
            .map(|i| bulletin.subset_field(key, i).and_then(|v| v.as_f64()))
            .collect()
    }
}

/// Build the composite station identity of every subset.
fn station_identities(bulletin: &dyn Bulletin, count: usize) -> Vec<String> {
    let mut identities = vec![String::new(); count];

    for &(key, width) in STATION_ID_FIELDS {
        if !bulletin.is_defined(key) {
            continue;
        }
        if count == 1 {
            if let Some(part) =
                bulletin.field(key).as_ref().and_then(|v| identity_component(v, 0, width))
            {
                identities[0].push_str(&part);
            }
        } else if bulletin.is_compressed() {
            let Some(value) = bulletin.field(key) else {
                debug!("error reading BUFR key {}", key);
                continue;
            };
            for (i, identity) in identities.iter_mut().enumerate() {
                // A length-1 value is shared by every subset.
                let index = if value.len() == 1 { 0 } else { i };
                if let Some(part) = identity_component(&value, index, width) {
                    identity.push_str(&part);
                }
            }
        } else {
            for (i, identity) in identities.iter_mut().enumerate() {
                let part = bulletin
                    .subset_field(key, i + 1)
                    .as_ref()
                    .and_then(|v| identity_component(v, 0, width));
                if let Some(part) = part {
                    identity.push_str(&part);
                }
            }
        }
    }

    identities
}

/// Render one element of a field value as an identity component.
fn identity_component(value: &FieldValue, index: usize, width: Option<usize>) -> Option<String> {
    match value {
        FieldValue::Integer(v) => Some(pad_numeric(*v, width)),
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::Float(v) => Some(v.to_string()),
        FieldValue::IntegerArray(v) => v.get(index).map(|v| pad_numeric(*v, width)),
        FieldValue::TextArray(v) => v.get(index).cloned(),
        FieldValue::FloatArray(v) => v.get(index).map(|v| v.to_string()),
    }
}

fn pad_numeric(value: i64, width: Option<usize>) -> String {
    match width {
        Some(w) => format!("{:0w$}", value, w = w),
        None => value.to_string(),
    }
}
