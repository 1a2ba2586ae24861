//! Extract command: materialize a cycle's consolidated output
//!
//! Reads the winning records back out of the cycle's index and appends each
//! winning subset to the consolidated BUFR file, skipping (with a warning)
//! any source file that has vanished since indexing.

use std::time::Instant;

use tracing::info;

use crate::Result;
use crate::app::adapters::codec::EnvelopeCodec;
use crate::app::services::extractor::{ExtractStats, materialize_output};
use crate::app::services::obs_index::IndexStore;
use crate::cli::args::ExtractArgs;
use crate::cli::commands::shared::{print_banner, summary_line};
use crate::config::{Config, ensure_dir, parse_cycle};

/// Run the extract command.
pub fn run_extract(args: ExtractArgs, debug: bool) -> Result<ExtractStats> {
    let started = Instant::now();
    let cycle = parse_cycle(&args.cycle)?;
    let config = Config {
        store_dir: args.store_dir,
        output_dir: args.output_dir,
        debug,
        ..Default::default()
    };
    ensure_dir(&config.output_dir)?;

    let store_path = config.store_path(cycle);
    let output_path = config.output_path(cycle);
    print_banner("SYNOP BUFR extractor");
    println!("Reading index entries from {}", store_path.display());
    println!("Writing BUFR messages to {}", output_path.display());

    let store = IndexStore::open_existing(&store_path)?;
    let codec = EnvelopeCodec::new();
    let stats = materialize_output(&codec, &store, &output_path)?;
    info!(
        "extracted {} subsets, skipped {}",
        stats.extracted, stats.skipped
    );

    println!();
    summary_line("subsets extracted", stats.extracted);
    summary_line("subsets skipped", stats.skipped);
    println!("Finished in {:.1?}", started.elapsed());

    Ok(stats)
}
