//! Update command: scan GTS directories and refresh a cycle's index
//!
//! Drives the directory-window scanner over the input tree, runs every
//! candidate file through the intake pipeline and offers the resulting
//! records to the priority index. Progress is persisted on entering each
//! directory, so a rerun resumes where the previous run stopped instead of
//! rescanning the whole window.

use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::app::adapters::codec::EnvelopeCodec;
use crate::app::services::bulletin_intake::parse_file;
use crate::app::services::obs_index::{IndexStore, UpsertOutcome};
use crate::app::services::scanner::{DirectoryScanner, ScanStep, StopReason};
use crate::cli::args::UpdateArgs;
use crate::cli::commands::shared::{create_progress_bar, print_banner, summary_line};
use crate::config::{Config, ensure_dir, parse_cycle};
use crate::Result;

/// Counters reported by one update run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct UpdateStats {
    pub directories_scanned: usize,
    pub files_examined: usize,
    pub files_admitted: usize,
    pub subsets_indexed: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub retained: usize,
}

/// Run the update command.
pub fn run_update(args: UpdateArgs, debug: bool) -> Result<UpdateStats> {
    let started = Instant::now();
    let cycle = parse_cycle(&args.cycle)?;
    let config = Config {
        gts_root: args.gts_root,
        store_dir: args.store_dir,
        window_minutes: args.window_minutes,
        horizon_hours: args.horizon_hours,
        debug,
        ..Default::default()
    };
    config.validate_for_update()?;
    ensure_dir(&config.store_dir)?;

    let store_path = config.store_path(cycle);
    print_banner("SYNOP GTS monitor");
    println!("Writing GTS data to {}", store_path.display());

    let store = IndexStore::open(&store_path)?;
    let window = store.load_or_init_window(cycle, config.window_minutes)?;
    info!(
        "cycle {} window {} .. {}, resuming at {}",
        cycle, window.min_accept, window.max_accept, window.last_scanned_dir
    );

    let codec = EnvelopeCodec::new();
    let mut scanner = DirectoryScanner::new(
        &config.gts_root,
        cycle,
        &window.last_scanned_dir,
        config.horizon_hours,
        Utc::now().naive_utc(),
    )?;

    let mut stats = UpdateStats::default();
    loop {
        match scanner.step() {
            ScanStep::Enter { name, path } => {
                info!("scanning directory {}", name);
                store.advance_progress(&name)?;
                stats.directories_scanned += 1;

                let files: Vec<_> = WalkDir::new(&path)
                    .min_depth(1)
                    .max_depth(1)
                    .into_iter()
                    .filter_map(|entry| match entry {
                        Ok(entry) if entry.file_type().is_file() => Some(entry),
                        Ok(_) => None,
                        Err(e) => {
                            warn!("skipping unreadable entry in {}: {}", name, e);
                            None
                        }
                    })
                    .collect();

                let pb = create_progress_bar(files.len() as u64, &name);
                for entry in files {
                    stats.files_examined += 1;
                    if let Some(bulletin) = parse_file(&codec, entry.path(), &window) {
                        stats.files_admitted += 1;
                        for record in bulletin.records(entry.path()) {
                            stats.subsets_indexed += 1;
                            match store.upsert(&record)? {
                                UpsertOutcome::Inserted => stats.inserted += 1,
                                UpsertOutcome::Replaced => stats.replaced += 1,
                                UpsertOutcome::Retained => stats.retained += 1,
                            }
                        }
                    }
                    pb.inc(1);
                }
                pb.finish_and_clear();
            }
            ScanStep::Gap { name } => {
                info!("directory {} doesn't exist, skipping", name);
            }
            ScanStep::Done(StopReason::HorizonReached) => {
                info!("stopping GTS parsing at horizon after cycle");
                break;
            }
            ScanStep::Done(StopReason::CaughtUp) => {
                info!("next directory doesn't exist yet, caught up");
                break;
            }
        }
    }

    println!();
    summary_line("directories scanned", stats.directories_scanned);
    summary_line("files examined", stats.files_examined);
    summary_line("files admitted", stats.files_admitted);
    summary_line("subsets indexed", stats.subsets_indexed);
    summary_line("inserted", stats.inserted);
    summary_line("replaced", stats.replaced);
    summary_line("retained", stats.retained);
    summary_line("records in index", store.record_count()?);
    println!("Finished in {:.1?}", started.elapsed());

    Ok(stats)
}
