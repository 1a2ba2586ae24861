//! Cleanup command: out-of-window retention sweep
//!
//! Deletes index records whose bulletin timestamp predates a cutoff. By
//! default the cutoff is the cycle window's lower bound, removing everything
//! an earlier, wider scan may have left behind.

use tracing::info;

use crate::Result;
use crate::app::models::CycleWindow;
use crate::app::services::obs_index::IndexStore;
use crate::cli::args::CleanupArgs;
use crate::cli::commands::shared::{print_banner, summary_line};
use crate::config::{Config, parse_cycle};

/// Run the cleanup command.
pub fn run_cleanup(args: CleanupArgs, debug: bool) -> Result<usize> {
    let cycle = parse_cycle(&args.cycle)?;
    let config = Config {
        store_dir: args.store_dir,
        debug,
        ..Default::default()
    };

    let cutoff = match &args.before {
        Some(value) => parse_cycle(value)?,
        None => CycleWindow::for_cycle(cycle, args.window_minutes).min_accept,
    };

    let store_path = config.store_path(cycle);
    print_banner("SYNOP index cleanup");
    println!("Sweeping {}", store_path.display());

    let store = IndexStore::open_existing(&store_path)?;
    let removed = store.cleanup_before(cutoff)?;
    info!("removed {} records dated before {}", removed, cutoff);

    println!();
    summary_line("records removed", removed);
    summary_line("records remaining", store.record_count()?);

    Ok(removed)
}
