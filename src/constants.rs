//! Application constants for the SYNOP monitor
//!
//! This module contains the GTS/BUFR tag values, time formats and default
//! values used throughout the application.

// =============================================================================
// GTS header tags
// =============================================================================

/// TT code for BUFR-encoded SYNOP land observations
pub const SYNOP_DATA_TYPE: &str = "IS";

/// Allowed second letters of the AA region code (northern hemisphere / Europe
/// coverage of interest)
pub const REGION_LETTERS: &[char] = &['A', 'D', 'N', 'X'];

/// BBB tag marking an original (non-amended) bulletin
pub const NIL_AMENDMENT: &str = "NNN";

/// Prefix of BBB tags marking a corrected/amended bulletin ("CCA", "CCB", ...)
pub const AMENDMENT_PREFIX: &str = "CC";

// =============================================================================
// Time windows and formats
// =============================================================================

/// Default observation window size in minutes, centered on the cycle time
pub const DEFAULT_WINDOW_MINUTES: u32 = 60;

/// Default scan horizon: no directory later than cycle + horizon is entered
pub const DEFAULT_HORIZON_HOURS: i64 = 48;

/// Name format of hourly GTS input directories
pub const DIR_NAME_FORMAT: &str = "%Y%m%d%H";

/// Format of the cycle argument on the command line
pub const CYCLE_FORMAT: &str = "%Y%m%d%H%M";

/// Bulletin timestamp format used as part of the index key
pub const BUCKET_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Datetime format of the window columns in the meta table
pub const META_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Per-cycle artifact names
// =============================================================================

/// Prefix of per-cycle store and output files
pub const CYCLE_FILE_PREFIX: &str = "synop_";

/// Extension of the per-cycle index store
pub const STORE_EXTENSION: &str = "sqlite";

/// Extension of the consolidated output file
pub const OUTPUT_EXTENSION: &str = "bufr";

// =============================================================================
// BUFR field names
// =============================================================================

/// BUFR key names read through the codec seam
pub mod bufr_keys {
    /// Nominal bulletin date, constant across subsets
    pub const TYPICAL_DATE: &str = "typicalDate";

    /// Nominal bulletin time, constant across subsets
    pub const TYPICAL_TIME: &str = "typicalTime";

    /// Subset position fields
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";

    /// WMO block number of a land station (2 digits)
    pub const BLOCK_NUMBER: &str = "blockNumber";

    /// WMO station number within a block (3 digits)
    pub const STATION_NUMBER: &str = "stationNumber";

    /// Callsign-style identifier of ships and mobile land stations
    pub const SHIP_OR_MOBILE_ID: &str = "shipOrMobileLandStationIdentifier";

    /// WMO buoy/platform number (5 digits)
    pub const BUOY_OR_PLATFORM_ID: &str = "buoyOrPlatformIdentifier";

    /// Identifier of stationary buoys deployed outside the WMO numbering
    pub const STATIONARY_BUOY_ID: &str = "stationaryBuoyPlatformIdentifierEGCManBuoys";
}

/// Station identifier fields in priority order, with the zero-padded width a
/// numeric value is formatted to (`None` = use the raw value). All fields a
/// bulletin defines are concatenated in this order; block and station number
/// combine into the classic 5-digit WMO station identity.
pub const STATION_ID_FIELDS: &[(&str, Option<usize>)] = &[
    (bufr_keys::BLOCK_NUMBER, Some(2)),
    (bufr_keys::STATION_NUMBER, Some(3)),
    (bufr_keys::SHIP_OR_MOBILE_ID, None),
    (bufr_keys::BUOY_OR_PLATFORM_ID, Some(5)),
    (bufr_keys::STATIONARY_BUOY_ID, None),
];
