//! Directory-window scanner
//!
//! GTS input arrives in hourly directories named `YYYYMMDDHH`. All traffic
//! for a cycle can arrive in any directory created after the window opens, so
//! the scanner steps forward one hour at a time from the persisted progress
//! position (re-entering the directory the previous run finished in — some
//! double work, bounded to one directory) until one of the terminal
//! conditions:
//!
//! - the hard horizon `cycle + horizon` is passed, even when directories
//!   exist beyond it;
//! - a directory is missing and lies in the future of wall-clock now, meaning
//!   nothing more has arrived yet.
//!
//! A missing directory in the past is a tolerated gap and is skipped. The
//! scanner itself is pure over the injected `now`; the caller persists
//! progress on every [`ScanStep::Enter`] before touching the directory's
//! files.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};

use crate::constants::DIR_NAME_FORMAT;
use crate::{Error, Result};

/// One scanner decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStep {
    /// Directory exists: persist progress, then process its files
    Enter { name: String, path: PathBuf },
    /// Directory missing but in the past: skip it
    Gap { name: String },
    /// Terminal condition reached
    Done(StopReason),
}

/// Why the scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Passed cycle + horizon
    HorizonReached,
    /// Next directory is missing and still in the future
    CaughtUp,
}

/// Stepper over the hourly directory sequence of one cycle.
#[derive(Debug)]
pub struct DirectoryScanner {
    root: PathBuf,
    horizon: NaiveDateTime,
    now: NaiveDateTime,
    current: NaiveDateTime,
}

impl DirectoryScanner {
    /// Position a scanner at the persisted progress directory.
    ///
    /// `now` is injected rather than read from the wall clock so the
    /// caught-up condition is testable.
    pub fn new(
        root: &Path,
        cycle: NaiveDateTime,
        last_scanned_dir: &str,
        horizon_hours: i64,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let current = parse_dir_name(last_scanned_dir).ok_or_else(|| {
            Error::configuration(format!(
                "malformed progress directory name: {last_scanned_dir:?}"
            ))
        })?;
        Ok(Self {
            root: root.to_path_buf(),
            horizon: cycle + Duration::hours(horizon_hours),
            now,
            current,
        })
    }

    /// Advance one hour and decide what to do with that directory.
    pub fn step(&mut self) -> ScanStep {
        let dir_time = self.current;
        let name = dir_name(dir_time);
        self.current += Duration::hours(1);

        if self.current > self.horizon {
            return ScanStep::Done(StopReason::HorizonReached);
        }

        let path = self.root.join(&name);
        if !path.is_dir() {
            if self.current > self.now {
                return ScanStep::Done(StopReason::CaughtUp);
            }
            return ScanStep::Gap { name };
        }
        ScanStep::Enter { name, path }
    }
}

/// Render an hourly directory name.
pub fn dir_name(time: NaiveDateTime) -> String {
    time.format(DIR_NAME_FORMAT).to_string()
}

/// Parse a `YYYYMMDDHH` directory name.
pub fn parse_dir_name(name: &str) -> Option<NaiveDateTime> {
    if name.len() != 10 || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = chrono::NaiveDate::parse_from_str(&name[..8], "%Y%m%d").ok()?;
    let hour: u32 = name[8..10].parse().ok()?;
    date.and_hms_opt(hour, 0, 0)
}
