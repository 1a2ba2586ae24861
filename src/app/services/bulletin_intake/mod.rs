//! Bulletin intake pipeline
//!
//! Takes one candidate file from the scanner through header resolution, date
//! resolution, the region/type filter and subset labeling, producing the
//! observation records the index ingests. Every failure mode along the way is
//! an absence: the file is skipped with a diagnostic and the scan continues.
//!
//! The module is organized into leaf components:
//! - [`header`] - canonical header from transmission metadata or filename
//! - [`date`] - day-of-month to full timestamp resolution
//! - [`filter`] - region/type admission predicate
//! - [`subsets`] - subset labeling and station identity composition

pub mod date;
pub mod filter;
pub mod header;
pub mod subsets;

#[cfg(test)]
pub mod tests;

pub use date::resolve_bulletin_date;
pub use filter::is_relevant;
pub use header::{header_from_filename, resolve_header};
pub use subsets::label_subsets;

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::app::adapters::codec::BufrCodec;
use crate::app::models::{CycleWindow, GtsHeader, ObservationRecord, SubsetLabel};

/// A fully admitted bulletin: resolved header, resolved timestamp and one
/// label per subset.
#[derive(Debug, Clone)]
pub struct IntakeBulletin {
    pub header: GtsHeader,
    pub timestamp: NaiveDateTime,
    pub labels: Vec<SubsetLabel>,
}

impl IntakeBulletin {
    /// Turn the labels into candidate index records pointing at `source`.
    pub fn records(&self, source: &Path) -> Vec<ObservationRecord> {
        let bucket = self.header.bucket(self.timestamp);
        self.labels
            .iter()
            .map(|label| ObservationRecord {
                bucket: bucket.clone(),
                amendment: self.header.amendment.clone(),
                station_identity: label.station_identity.clone(),
                source_file: source.to_path_buf(),
                subset: label.subset,
            })
            .collect()
    }
}

/// Run one file through the intake pipeline.
///
/// Returns `None` (file skipped) on unreadable files, malformed headers,
/// unresolvable dates, out-of-window timestamps, out-of-scope bulletins and
/// unsupported file shapes.
pub fn parse_file(
    codec: &dyn BufrCodec,
    path: &Path,
    window: &CycleWindow,
) -> Option<IntakeBulletin> {
    debug!("parsing {}", path.display());
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("cannot read {}: {}", path.display(), e);
            return None;
        }
    };

    let Some(header) = resolve_header(codec, &raw, path) else {
        debug!("no valid GTS header: {}", path.display());
        return None;
    };

    let Some(timestamp) = resolve_bulletin_date(&header, window.max_accept) else {
        debug!("no valid date retrieved: {}", path.display());
        return None;
    };

    if !window.accepts(timestamp) {
        debug!("not in time window: {}", path.display());
        return None;
    }

    if !is_relevant(&header) {
        debug!("not in region/type scope: {}", path.display());
        return None;
    }

    let labels = label_subsets(codec, &raw)?;
    Some(IntakeBulletin {
        header,
        timestamp,
        labels,
    })
}
