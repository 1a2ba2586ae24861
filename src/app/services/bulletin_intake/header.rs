//! GTS header resolution
//!
//! A bulletin's canonical header normally comes from its transmission
//! envelope, read through the codec. Files delivered without the envelope
//! (e.g. copied locally, so the transmission sequence number is missing) fall
//! back to the structured filename `TTAAII_CCCC_YYGGgg[_BBB]`. Anything that
//! deviates from either shape resolves to `None` and the file is discarded;
//! this resolver never guesses.

use std::path::Path;

use tracing::debug;

use crate::app::adapters::codec::BufrCodec;
use crate::app::models::GtsHeader;
use crate::constants::NIL_AMENDMENT;

/// Resolve the canonical header of a bulletin file, preferring the embedded
/// transmission metadata over the filename.
pub fn resolve_header(codec: &dyn BufrCodec, raw: &[u8], path: &Path) -> Option<GtsHeader> {
    if let Some(header) = codec.decode_header(raw) {
        return Some(header);
    }
    debug!("no transmission header, trying filename: {}", path.display());
    header_from_filename(path)
}

/// Parse a header from a `TTAAII_CCCC_YYGGgg[_BBB]` filename.
///
/// The name must be exactly 18 or 22 characters with literal `_` separators at
/// positions 6 and 11 (and 18 for the long form). Fields are taken from fixed
/// offsets; the amendment tag defaults to "NNN" in the short form.
pub fn header_from_filename(path: &Path) -> Option<GtsHeader> {
    let name = path.file_name()?.to_str()?;
    if name.len() != 18 && name.len() != 22 {
        return None;
    }
    let bytes = name.as_bytes();
    if bytes[6] != b'_' || bytes[11] != b'_' {
        return None;
    }
    let amendment = if name.len() == 22 {
        if bytes[18] != b'_' {
            return None;
        }
        name.get(19..22)?.to_string()
    } else {
        NIL_AMENDMENT.to_string()
    };

    Some(GtsHeader {
        data_type: name.get(0..2)?.to_string(),
        region: name.get(2..4)?.to_string(),
        bulletin_number: name.get(4..6)?.to_string(),
        origin_center: name.get(7..11)?.to_string(),
        day: name.get(12..14)?.to_string(),
        hour: name.get(14..16)?.to_string(),
        minute: name.get(16..18)?.to_string(),
        amendment,
    })
}
