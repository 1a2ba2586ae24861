//! Bulletin date resolution
//!
//! GTS headings carry only the day of the month, so month and year must be
//! reconstructed from a reference date (the scan window's upper bound). The
//! rule: a header day no more than one past the reference day belongs to the
//! reference month, anything larger belongs to the previous month, rolling the
//! year back across January.
//!
//! Known approximation: near month boundaries the previous-month assumption
//! can produce an impossible date (day 31 in a 30-day month, e.g. 31 May seen
//! from a 1 June reference resolving toward 31 April). Such combinations
//! resolve to `None` and the bulletin is discarded; the heuristic is kept as a
//! single pure function so the limitation stays testable.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::app::models::GtsHeader;

/// Resolve a header's day/hour/minute tags against a reference date.
///
/// Returns `None` for non-numeric tags, out-of-range times and impossible
/// (year, month, day) combinations.
pub fn resolve_bulletin_date(header: &GtsHeader, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    let day: u32 = header.day.parse().ok()?;
    let hour: u32 = header.hour.parse().ok()?;
    let minute: u32 = header.minute.parse().ok()?;

    // One day of margin: a bulletin dated "tomorrow" relative to the
    // reference (late-arriving 23h traffic) still counts as this month.
    let (year, month) = if day <= reference.day() + 1 {
        (reference.year(), reference.month())
    } else if reference.month() > 1 {
        (reference.year(), reference.month() - 1)
    } else {
        (reference.year() - 1, 12)
    };

    let resolved = NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(hour, minute, 0));
    if resolved.is_none() {
        debug!(
            "unresolvable bulletin date: year={} month={} YY={} GG={} gg={}",
            year, month, header.day, header.hour, header.minute
        );
    }
    resolved
}
