//! Core data models for the SYNOP monitor
//!
//! Fixed-shape record types for the entities flowing through the pipeline:
//! the canonical GTS bulletin header, the per-subset label, the indexed
//! observation record and the per-cycle scan window.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{BUCKET_TIMESTAMP_FORMAT, NIL_AMENDMENT};

/// Canonical GTS bulletin header, derived either from the transmission
/// envelope or from a structured filename. Field names follow the WMO
/// abbreviated heading `TTAAII CCCC YYGGgg [BBB]`.
///
/// Immutable once derived. The day/hour/minute tags are kept as the raw
/// 2-character strings of the heading; turning them into a full timestamp is
/// the date resolver's job, since the day of month alone is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GtsHeader {
    /// Data type designator (TT), e.g. "IS" for BUFR SYNOP land reports
    pub data_type: String,
    /// Geographic region designator (AA)
    pub region: String,
    /// Bulletin number within the (TT, AA) series (II)
    pub bulletin_number: String,
    /// Originating center (CCCC), 4 characters
    pub origin_center: String,
    /// Day of month (YY), 2 characters
    pub day: String,
    /// Hour (GG), 2 characters
    pub hour: String,
    /// Minute (gg), 2 characters
    pub minute: String,
    /// Amendment tag (BBB); "NNN" when the heading carries none
    pub amendment: String,
}

impl GtsHeader {
    /// Bind this header to its resolved timestamp, producing the bucket that
    /// identifies one bulletin slot in the index.
    pub fn bucket(&self, timestamp: NaiveDateTime) -> HeaderBucket {
        HeaderBucket {
            data_type: self.data_type.clone(),
            region: self.region.clone(),
            bulletin_number: self.bulletin_number.clone(),
            origin_center: self.origin_center.clone(),
            timestamp,
        }
    }

    /// Whether the amendment tag marks an original, unamended bulletin.
    pub fn is_original(&self) -> bool {
        self.amendment == NIL_AMENDMENT
    }
}

/// The combination of data type, region, bulletin number, origin and resolved
/// timestamp identifying one bulletin slot. Together with a station identity
/// it keys the observation index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeaderBucket {
    pub data_type: String,
    pub region: String,
    pub bulletin_number: String,
    pub origin_center: String,
    pub timestamp: NaiveDateTime,
}

impl HeaderBucket {
    /// Timestamp rendered in the store's key format. Lexicographic order of
    /// this rendering matches chronological order, which the retention sweep
    /// relies on.
    pub fn timestamp_key(&self) -> String {
        self.timestamp.format(BUCKET_TIMESTAMP_FORMAT).to_string()
    }
}

impl std::fmt::Display for HeaderBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{} {} {}",
            self.data_type,
            self.region,
            self.bulletin_number,
            self.origin_center,
            self.timestamp_key()
        )
    }
}

/// Label derived for one observation subset inside a bulletin.
///
/// Position and nominal date/time are carried for diagnostics; only the
/// station identity participates in the index key. An empty identity is a
/// degenerate but valid label: bulletins whose schema defines none of the
/// identifier fields are still indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetLabel {
    /// 1-based subset number within the bulletin
    pub subset: usize,
    /// Nominal bulletin date (e.g. "20210530"), broadcast to all subsets
    pub typical_date: Option<String>,
    /// Nominal bulletin time (e.g. "1200"), broadcast to all subsets
    pub typical_time: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Composite station identity, possibly empty
    pub station_identity: String,
}

/// One winning observation in the index: which subset of which physical file
/// currently holds the best version of a (bucket, station) slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub bucket: HeaderBucket,
    /// Amendment tag of the transmission this record came from
    pub amendment: String,
    pub station_identity: String,
    /// Source bulletin file the subset can be re-extracted from
    pub source_file: PathBuf,
    /// 1-based subset number within the source file's bulletin
    pub subset: usize,
}

impl ObservationRecord {
    /// Render the unique key of this record for diagnostics.
    pub fn key(&self) -> String {
        format!("{} SID={}", self.bucket, self.station_identity)
    }
}

/// Per-cycle scan window and scanner progress, persisted in the store's meta
/// table so repeated runs resume instead of rescanning from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleWindow {
    /// Nominal observation cycle time
    pub cycle: NaiveDateTime,
    /// Earliest accepted bulletin timestamp (inclusive)
    pub min_accept: NaiveDateTime,
    /// Latest accepted bulletin timestamp (inclusive)
    pub max_accept: NaiveDateTime,
    /// Name of the last hourly directory the scanner entered
    pub last_scanned_dir: String,
}

impl CycleWindow {
    /// Build the acceptance window for a cycle.
    ///
    /// With a window size of W minutes and N = W/2, bulletins dated within
    /// `[cycle - (N-1), cycle + N]` minutes are accepted: a 20:00 cycle with
    /// the default 60-minute window covers 19:31 through 20:30. The initial
    /// scanner position is the window start truncated to the hour.
    pub fn for_cycle(cycle: NaiveDateTime, window_minutes: u32) -> Self {
        let half = i64::from(window_minutes / 2);
        let min_accept = cycle - Duration::minutes(half - 1);
        let max_accept = cycle + Duration::minutes(half);
        let first_dir = min_accept
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .unwrap_or(min_accept);
        Self {
            cycle,
            min_accept,
            max_accept,
            last_scanned_dir: first_dir.format(crate::constants::DIR_NAME_FORMAT).to_string(),
        }
    }

    /// Whether a resolved bulletin timestamp falls inside the window.
    pub fn accepts(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.min_accept && timestamp <= self.max_accept
    }
}
