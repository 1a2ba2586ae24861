//! SYNOP Monitor Library
//!
//! A Rust library for monitoring GTS directory trees of incoming BUFR-encoded
//! SYNOP bulletins. Competing transmissions of the same observation (originals,
//! retransmissions, amendments) are deduplicated into a per-cycle SQLite index,
//! from which the winning observation subsets are later re-extracted into a
//! single consolidated BUFR file.
//!
//! This library provides tools for:
//! - Resolving canonical GTS bulletin headers from transmission envelopes or
//!   structured filenames
//! - Reconstructing full bulletin timestamps from day-of-month-only header tags
//! - Labeling BUFR observation subsets with a composite station identity
//! - Maintaining an arrival-order-insensitive priority index of winning records
//! - Scanning hourly GTS directories within a bounded time horizon
//! - Materializing the consolidated output file for an observation cycle

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod bulletin_intake;
        pub mod extractor;
        pub mod obs_index;
        pub mod scanner;
    }
    pub mod adapters {
        pub mod codec;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CycleWindow, GtsHeader, ObservationRecord};
pub use config::Config;

/// Result type alias for the SYNOP monitor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SYNOP monitor operations
///
/// Most per-file failure modes (malformed headers, ambiguous dates, unsupported
/// file shapes) are absences, not errors: the intake pipeline converts them to
/// `None` at its own boundary and the scan continues. The variants here cover
/// the remaining failures, of which only [`Error::IndexConsistency`] aborts a
/// run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Index store operation failed
    #[error("index store error: {message}")]
    Store {
        message: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Per-cycle index file does not exist
    #[error("index store not found: {path}")]
    StoreMissing { path: String },

    /// More than one stored record under a unique (header, station) key
    #[error("index consistency violation: {count} records stored for key {key}")]
    IndexConsistency { key: String, count: usize },

    /// Configuration error
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Date/time parsing error
    #[error("date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Directory traversal error
    #[error("directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// External codec failure surfaced to the caller
    #[error("codec error: {message}")]
    Codec { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an index store error with context
    pub fn store(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Store {
            message: message.into(),
            source,
        }
    }

    /// Create a missing-store error
    pub fn store_missing(path: impl Into<String>) -> Self {
        Self::StoreMissing { path: path.into() }
    }

    /// Create a fatal index consistency violation
    pub fn index_consistency(key: impl Into<String>, count: usize) -> Self {
        Self::IndexConsistency {
            key: key.into(),
            count,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a codec error
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::Store {
            message: "index store operation failed".to_string(),
            source: error,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "date/time parsing failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "directory traversal failed".to_string(),
            source: error,
        }
    }
}
