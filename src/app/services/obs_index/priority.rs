//! Amendment-tag priority rule
//!
//! Two transmissions competing for the same (header bucket, station identity)
//! slot are ranked by their BBB amendment tag alone, never by arrival order:
//! GTS delivery order is unreliable, and a correction is routinely read before
//! the original it corrects. The rule:
//!
//! - an incoming original ("NNN" or any non-"CC" tag) never displaces a
//!   stored record;
//! - an incoming amendment displaces a stored original;
//! - between amendments the lexicographically larger tag wins ("CCB" beats
//!   "CCA"); equal tags keep the stored record, a duplicate transmission.
//!
//! For any fixed set of candidates with distinct tags the final winner is
//! therefore the same whatever order they arrive in: the maximal amendment
//! tag if one exists, else the first original seen.
//
// TODO: an original re-sent after an amendment never displaces it, even when
// the retransmission is newer; confirm against upstream GTS practice whether a
// repeat original should reset the slot.

use crate::constants::AMENDMENT_PREFIX;

/// Whether the stored record keeps its slot against an incoming candidate.
///
/// Returns `true` when the stored tag wins or ties; the caller replaces the
/// record only on `false`.
pub fn retains_priority(stored_tag: &str, incoming_tag: &str) -> bool {
    if incoming_tag.starts_with(AMENDMENT_PREFIX) {
        if stored_tag.starts_with(AMENDMENT_PREFIX) {
            incoming_tag <= stored_tag
        } else {
            false
        }
    } else {
        true
    }
}
