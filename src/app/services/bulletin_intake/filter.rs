//! Region/type admission filter
//!
//! Pure predicate over the resolved header: only BUFR SYNOP land bulletins
//! (TT = "IS") whose region code points at the coverage of interest are
//! admitted. The second letter of AA carries the geographic area; the
//! allow-list lives in [`crate::constants::REGION_LETTERS`].

use crate::app::models::GtsHeader;
use crate::constants::{REGION_LETTERS, SYNOP_DATA_TYPE};

/// Whether a bulletin is in scope for the monitor.
pub fn is_relevant(header: &GtsHeader) -> bool {
    if header.data_type != SYNOP_DATA_TYPE {
        return false;
    }
    match header.region.chars().nth(1) {
        Some(letter) => REGION_LETTERS.contains(&letter),
        None => false,
    }
}
