//! Runtime configuration
//!
//! All knobs are captured once at process start from the command line and
//! passed explicitly to the components that need them; nothing reads the
//! process environment during a scan. (The debug switch in particular used to
//! be an environment variable consulted on every diagnostic in the system
//! this replaces.)

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CYCLE_FILE_PREFIX, CYCLE_FORMAT, DEFAULT_HORIZON_HOURS, DEFAULT_WINDOW_MINUTES,
    OUTPUT_EXTENSION, STORE_EXTENSION,
};
use crate::{Error, Result};

/// Configuration shared by the monitor's commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the GTS input tree (hourly `YYYYMMDDHH` subdirectories)
    pub gts_root: PathBuf,
    /// Directory holding the per-cycle index stores
    pub store_dir: PathBuf,
    /// Directory the consolidated output files are written to
    pub output_dir: PathBuf,
    /// Observation window size in minutes, centered on the cycle
    pub window_minutes: u32,
    /// Scan horizon in hours after the cycle
    pub horizon_hours: i64,
    /// Verbose per-file diagnostics
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gts_root: PathBuf::from("."),
            store_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            window_minutes: DEFAULT_WINDOW_MINUTES,
            horizon_hours: DEFAULT_HORIZON_HOURS,
            debug: false,
        }
    }
}

impl Config {
    /// Validate the pieces the update pass depends on.
    pub fn validate_for_update(&self) -> Result<()> {
        if !self.gts_root.is_dir() {
            return Err(Error::configuration(format!(
                "GTS root is not a directory: {}",
                self.gts_root.display()
            )));
        }
        if self.window_minutes == 0 {
            return Err(Error::configuration("window size must be positive"));
        }
        if self.horizon_hours <= 0 {
            return Err(Error::configuration("scan horizon must be positive"));
        }
        Ok(())
    }

    /// Per-cycle index store path, e.g. `synop_202105302000.sqlite`.
    pub fn store_path(&self, cycle: NaiveDateTime) -> PathBuf {
        self.store_dir.join(cycle_file_name(cycle, STORE_EXTENSION))
    }

    /// Per-cycle consolidated output path, e.g. `synop_202105302000.bufr`.
    pub fn output_path(&self, cycle: NaiveDateTime) -> PathBuf {
        self.output_dir
            .join(cycle_file_name(cycle, OUTPUT_EXTENSION))
    }
}

fn cycle_file_name(cycle: NaiveDateTime, extension: &str) -> String {
    format!(
        "{}{}.{}",
        CYCLE_FILE_PREFIX,
        cycle.format(CYCLE_FORMAT),
        extension
    )
}

/// Parse a `YYYYMMDDHHMM` cycle argument.
pub fn parse_cycle(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, CYCLE_FORMAT)
        .map_err(|e| Error::datetime_parsing(format!("cycle argument {value:?}"), e))
}

/// Ensure a directory exists, creating it as needed.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .map_err(|e| Error::io(format!("creating directory {}", path.display()), e))
}
