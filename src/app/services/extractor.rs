//! Consolidated output materialization
//!
//! Second pass over a cycle's index: read the winning records in index order
//! and ask the codec to append each winning subset to the consolidated output
//! file. Source files can vanish between indexing and extraction (GTS input
//! trees get pruned); a vanished file or a failing extraction drops that
//! subset with a warning and the pass continues.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::app::adapters::codec::BufrCodec;
use crate::app::services::obs_index::IndexStore;
use crate::{Error, Result};

/// Outcome counts of one materialization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    /// Subsets written to the output file
    pub extracted: usize,
    /// Records skipped (vanished source, codec failure, bad subset number)
    pub skipped: usize,
}

/// Append every winning subset of `store` to `output`.
///
/// The output file is opened in append mode, matching repeated incremental
/// runs of the extraction pass.
pub fn materialize_output(
    codec: &dyn BufrCodec,
    store: &IndexStore,
    output: &Path,
) -> Result<ExtractStats> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output)
        .map_err(|e| Error::io(format!("opening output {}", output.display()), e))?;
    let mut writer = BufWriter::new(file);

    let mut stats = ExtractStats::default();
    for record in store.winning_records()? {
        let raw = match fs::read(&record.source_file) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "source file vanished, omitting subset {} of {}: {}",
                    record.subset,
                    record.source_file.display(),
                    e
                );
                stats.skipped += 1;
                continue;
            }
        };

        let Some(bulletin) = codec.decode_bulletin(&raw) else {
            warn!("undecodable source file: {}", record.source_file.display());
            stats.skipped += 1;
            continue;
        };
        if record.subset > bulletin.subset_count() {
            warn!(
                "subset {} out of range in {}",
                record.subset,
                record.source_file.display()
            );
            stats.skipped += 1;
            continue;
        }

        match bulletin.extract_subset(record.subset, &mut writer) {
            Ok(()) => {
                debug!(
                    "extracted subset {} of {}",
                    record.subset,
                    record.source_file.display()
                );
                stats.extracted += 1;
            }
            Err(e) => {
                warn!(
                    "extraction failed for {}: {}",
                    record.source_file.display(),
                    e
                );
                stats.skipped += 1;
            }
        }
    }

    writer
        .flush()
        .map_err(|e| Error::io("flushing consolidated output", e))?;
    Ok(stats)
}
