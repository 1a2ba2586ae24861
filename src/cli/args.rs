//! Command-line argument definitions for the SYNOP monitor
//!
//! Defines the CLI surface with the clap derive API. The two main passes over
//! a cycle's index — building it and materializing its output — are separable
//! subcommands, plus a retention sweep for long-lived stores.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::{DEFAULT_HORIZON_HOURS, DEFAULT_WINDOW_MINUTES};

/// CLI arguments for the SYNOP GTS monitor
#[derive(Debug, Clone, Parser)]
#[command(
    name = "synop-monitor",
    version,
    about = "Monitor GTS directories of BUFR SYNOP bulletins and extract the winning observations per cycle",
    long_about = "Scans hourly GTS input directories for BUFR-encoded SYNOP bulletins, deduplicates \
                  competing transmissions of the same observation into a per-cycle SQLite index \
                  using the BBB amendment tag, and later re-extracts the winning observation \
                  subsets into one consolidated BUFR file per observation cycle."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose per-file diagnostics
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Scan GTS directories and update the index for an observation cycle
    Update(UpdateArgs),
    /// Materialize the consolidated BUFR output file for a cycle
    Extract(ExtractArgs),
    /// Delete out-of-window records from a cycle's index
    Cleanup(CleanupArgs),
}

/// Arguments for the update command (index building)
#[derive(Debug, Clone, Parser)]
pub struct UpdateArgs {
    /// Observation cycle, e.g. 202105302000
    #[arg(short = 'c', long = "cycle", value_name = "YYYYMMDDHHMM")]
    pub cycle: String,

    /// Root of the GTS input tree (hourly YYYYMMDDHH subdirectories)
    #[arg(short = 'g', long = "gts-root", value_name = "PATH")]
    pub gts_root: PathBuf,

    /// Directory holding the per-cycle index stores
    #[arg(short = 's', long = "store-dir", value_name = "PATH", default_value = ".")]
    pub store_dir: PathBuf,

    /// Observation window size in minutes, centered on the cycle
    #[arg(long = "window-minutes", value_name = "MINUTES", default_value_t = DEFAULT_WINDOW_MINUTES)]
    pub window_minutes: u32,

    /// Scan horizon in hours after the cycle
    #[arg(long = "horizon-hours", value_name = "HOURS", default_value_t = DEFAULT_HORIZON_HOURS)]
    pub horizon_hours: i64,
}

/// Arguments for the extract command (output materialization)
#[derive(Debug, Clone, Parser)]
pub struct ExtractArgs {
    /// Observation cycle, e.g. 202105302000
    #[arg(short = 'c', long = "cycle", value_name = "YYYYMMDDHHMM")]
    pub cycle: String,

    /// Directory holding the per-cycle index stores
    #[arg(short = 's', long = "store-dir", value_name = "PATH", default_value = ".")]
    pub store_dir: PathBuf,

    /// Directory the consolidated output file is written to
    #[arg(short = 'o', long = "output-dir", value_name = "PATH", default_value = ".")]
    pub output_dir: PathBuf,
}

/// Arguments for the cleanup command (retention sweep)
#[derive(Debug, Clone, Parser)]
pub struct CleanupArgs {
    /// Observation cycle, e.g. 202105302000
    #[arg(short = 'c', long = "cycle", value_name = "YYYYMMDDHHMM")]
    pub cycle: String,

    /// Directory holding the per-cycle index stores
    #[arg(short = 's', long = "store-dir", value_name = "PATH", default_value = ".")]
    pub store_dir: PathBuf,

    /// Delete records dated before this cutoff; defaults to the cycle
    /// window's lower bound
    #[arg(long = "before", value_name = "YYYYMMDDHHMM")]
    pub before: Option<String>,

    /// Window size used to derive the default cutoff
    #[arg(long = "window-minutes", value_name = "MINUTES", default_value_t = DEFAULT_WINDOW_MINUTES)]
    pub window_minutes: u32,
}
