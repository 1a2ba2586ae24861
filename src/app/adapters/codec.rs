//! Codec seam between the monitor and BUFR decoding
//!
//! Full table-driven BUFR decoding is an external concern. The monitor only
//! ever asks a codec for transmission headers, message counts, a handful of
//! per-subset fields and raw subset extraction, so that surface is captured by
//! the [`BufrCodec`] and [`Bulletin`] traits. Any decode failure is an absence
//! (`None`) at this boundary; the intake pipeline turns absences into skipped
//! files.
//!
//! [`EnvelopeCodec`] is the built-in implementation. It decodes everything
//! that lives at fixed offsets of the transmission envelope and the BUFR
//! section skeleton (GTS abbreviated heading, message count, subset count,
//! compression flag, typical date/time) without external tables. Element
//! fields such as station identifiers and positions are undefined for it, so
//! subsets labeled through it fall back to the empty station identity. A
//! table-driven codec (e.g. an ecCodes binding) can be dropped in behind the
//! same traits without touching the pipeline.

use std::io::Write;

use crate::app::models::GtsHeader;
use crate::constants::{NIL_AMENDMENT, bufr_keys};
use crate::{Error, Result};

/// A decoded BUFR field value.
///
/// Scalar variants are whole-message values (or broadcast values in compressed
/// data); array variants carry one element per subset.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
    IntegerArray(Vec<i64>),
    FloatArray(Vec<f64>),
    TextArray(Vec<String>),
}

impl FieldValue {
    /// Number of elements carried by this value (1 for scalars).
    pub fn len(&self) -> usize {
        match self {
            FieldValue::IntegerArray(v) => v.len(),
            FieldValue::FloatArray(v) => v.len(),
            FieldValue::TextArray(v) => v.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalar float view, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Scalar text view.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Handle on one decoded BUFR bulletin.
pub trait Bulletin {
    /// Number of observation subsets in the bulletin.
    fn subset_count(&self) -> usize;

    /// Whether the data section is internally compressed.
    fn is_compressed(&self) -> bool;

    /// Whether the bulletin's schema defines a field at all.
    fn is_defined(&self, key: &str) -> bool;

    /// Whole-message field access. Compressed per-subset values come back as
    /// the array variants.
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Per-subset field access for uncompressed multi-subset data
    /// (the `#subset#key` accessor); `subset` is 1-based.
    fn subset_field(&self, key: &str, subset: usize) -> Option<FieldValue>;

    /// Write subset `subset` (1-based) as a standalone BUFR message.
    fn extract_subset(&self, subset: usize, out: &mut dyn Write) -> Result<()>;
}

/// External decoder collaborator.
pub trait BufrCodec {
    /// Decode the GTS transmission header, if the file carries one. Local
    /// files without a transmission envelope yield `None`; the caller then
    /// falls back to filename parsing.
    fn decode_header(&self, raw: &[u8]) -> Option<GtsHeader>;

    /// Count the BUFR messages in the file. Undecodable content counts zero.
    fn count_messages(&self, raw: &[u8]) -> usize;

    /// Decode the first BUFR message into a bulletin handle.
    fn decode_bulletin(&self, raw: &[u8]) -> Option<Box<dyn Bulletin>>;
}

// =============================================================================
// Built-in envelope codec
// =============================================================================

const SOH: u8 = 0x01;
const BUFR_MAGIC: &[u8] = b"BUFR";
const BUFR_TRAILER: &[u8] = b"7777";
/// Heading plus sequence-number lines fit comfortably in this prefix.
const HEADING_SCAN_LIMIT: usize = 128;

/// Built-in codec over the GTS envelope and the fixed-offset BUFR sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeCodec;

impl EnvelopeCodec {
    pub fn new() -> Self {
        Self
    }
}

impl BufrCodec for EnvelopeCodec {
    fn decode_header(&self, raw: &[u8]) -> Option<GtsHeader> {
        // A real transmission starts with SOH; files captured without the
        // envelope are left to the filename fallback.
        if raw.first() != Some(&SOH) {
            return None;
        }
        let prefix = &raw[..raw.len().min(HEADING_SCAN_LIMIT)];
        let text = String::from_utf8_lossy(prefix);
        for line in text.lines() {
            let line = line.trim_matches(|c: char| c.is_control() || c == ' ');
            if let Some(header) = parse_heading_line(line) {
                return Some(header);
            }
        }
        None
    }

    fn count_messages(&self, raw: &[u8]) -> usize {
        let mut count = 0;
        let mut pos = 0;
        while let Some(offset) = find(&raw[pos..], BUFR_MAGIC) {
            let start = pos + offset;
            match message_length(raw, start) {
                Some(len) => {
                    count += 1;
                    pos = start + len;
                }
                // Truncated or corrupted message: nothing decodable follows.
                None => break,
            }
        }
        count
    }

    fn decode_bulletin(&self, raw: &[u8]) -> Option<Box<dyn Bulletin>> {
        let start = find(raw, BUFR_MAGIC)?;
        let len = message_length(raw, start)?;
        let message = &raw[start..start + len];
        EnvelopeBulletin::parse(message).map(|b| Box::new(b) as Box<dyn Bulletin>)
    }
}

/// Parse a WMO abbreviated heading line `TTAAII CCCC YYGGgg [BBB]`.
fn parse_heading_line(line: &str) -> Option<GtsHeader> {
    if line.len() != 18 && line.len() != 22 {
        return None;
    }
    let bytes = line.as_bytes();
    if bytes[6] != b' ' || bytes[11] != b' ' {
        return None;
    }
    if !bytes[..6].iter().all(u8::is_ascii_alphanumeric)
        || !bytes[7..11].iter().all(u8::is_ascii_alphanumeric)
        || !bytes[12..18].iter().all(u8::is_ascii_digit)
    {
        return None;
    }
    let amendment = if line.len() == 22 {
        if bytes[18] != b' ' || !bytes[19..22].iter().all(u8::is_ascii_alphanumeric) {
            return None;
        }
        line[19..22].to_string()
    } else {
        NIL_AMENDMENT.to_string()
    };
    Some(GtsHeader {
        data_type: line[0..2].to_string(),
        region: line[2..4].to_string(),
        bulletin_number: line[4..6].to_string(),
        origin_center: line[7..11].to_string(),
        day: line[12..14].to_string(),
        hour: line[14..16].to_string(),
        minute: line[16..18].to_string(),
        amendment,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Validate the section-0 skeleton of a message starting at `start` and return
/// its total length.
fn message_length(raw: &[u8], start: usize) -> Option<usize> {
    let total = read_u24(raw, start + 4)?;
    if total < 8 || start + total > raw.len() {
        return None;
    }
    let edition = *raw.get(start + 7)?;
    if !(2..=4).contains(&edition) {
        return None;
    }
    if &raw[start + total - 4..start + total] != BUFR_TRAILER {
        return None;
    }
    Some(total)
}

fn read_u24(raw: &[u8], at: usize) -> Option<usize> {
    let bytes = raw.get(at..at + 3)?;
    Some(((bytes[0] as usize) << 16) | ((bytes[1] as usize) << 8) | bytes[2] as usize)
}

/// Bulletin handle backed by the fixed-offset BUFR section fields.
#[derive(Debug, Clone)]
pub struct EnvelopeBulletin {
    data: Vec<u8>,
    subsets: usize,
    compressed: bool,
    typical_date: String,
    typical_time: String,
}

impl EnvelopeBulletin {
    /// Parse sections 0, 1 and 3 of a single validated BUFR message.
    fn parse(message: &[u8]) -> Option<Self> {
        let edition = *message.get(7)?;
        let section1 = message.get(8..)?;
        let s1_len = read_u24(section1, 0)?;
        if section1.len() < s1_len {
            return None;
        }

        let (year, month, day, hour, minute, optional_section) = match edition {
            4 => {
                if s1_len < 22 {
                    return None;
                }
                let year = ((section1[15] as i32) << 8) | section1[16] as i32;
                (
                    year,
                    section1[17],
                    section1[18],
                    section1[19],
                    section1[20],
                    section1[9] & 0x80 != 0,
                )
            }
            // Editions 2 and 3 share the section-1 layout; the year is a year
            // of century.
            _ => {
                if s1_len < 17 {
                    return None;
                }
                let yy = section1[12] as i32;
                let year = if yy > 50 { 1900 + yy } else { 2000 + yy };
                (
                    year,
                    section1[13],
                    section1[14],
                    section1[15],
                    section1[16],
                    section1[7] & 0x80 != 0,
                )
            }
        };

        let mut offset = 8 + s1_len;
        if optional_section {
            let s2_len = read_u24(message, offset)?;
            offset += s2_len;
        }
        let section3 = message.get(offset..)?;
        if section3.len() < 7 {
            return None;
        }
        let subsets = ((section3[4] as usize) << 8) | section3[5] as usize;
        let compressed = section3[6] & 0x40 != 0;

        Some(Self {
            data: message.to_vec(),
            subsets,
            compressed,
            typical_date: format!("{:04}{:02}{:02}", year, month, day),
            typical_time: format!("{:02}{:02}", hour, minute),
        })
    }
}

impl Bulletin for EnvelopeBulletin {
    fn subset_count(&self) -> usize {
        self.subsets
    }

    fn is_compressed(&self) -> bool {
        self.compressed
    }

    fn is_defined(&self, key: &str) -> bool {
        matches!(key, bufr_keys::TYPICAL_DATE | bufr_keys::TYPICAL_TIME)
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            bufr_keys::TYPICAL_DATE => Some(FieldValue::Text(self.typical_date.clone())),
            bufr_keys::TYPICAL_TIME => Some(FieldValue::Text(self.typical_time.clone())),
            _ => None,
        }
    }

    fn subset_field(&self, _key: &str, _subset: usize) -> Option<FieldValue> {
        None
    }

    fn extract_subset(&self, subset: usize, out: &mut dyn Write) -> Result<()> {
        if subset == 0 || subset > self.subsets {
            return Err(Error::codec(format!(
                "subset {} out of range (bulletin has {})",
                subset, self.subsets
            )));
        }
        if self.subsets > 1 {
            // Splitting a multi-subset message needs table-driven re-encoding.
            return Err(Error::codec(
                "multi-subset extraction requires a table-driven codec",
            ));
        }
        out.write_all(&self.data)
            .map_err(|e| Error::io("writing extracted subset", e))
    }
}

// =============================================================================
// Test double
// =============================================================================
