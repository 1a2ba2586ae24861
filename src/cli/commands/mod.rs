//! Command implementations for the SYNOP monitor CLI
//!
//! Each subcommand lives in its own module; [`run`] dispatches on the parsed
//! arguments. All commands are synchronous single-pass operations over one
//! cycle's store.

pub mod cleanup;
pub mod extract;
pub mod shared;
pub mod update;

use crate::Result;
use crate::cli::args::{Args, Commands};

/// Dispatch the parsed CLI arguments to the matching command.
pub fn run(args: Args) -> Result<()> {
    let debug = args.debug;
    let Some(command) = args.command else {
        // main prints help for bare invocations before calling run
        return Err(crate::Error::configuration("no subcommand provided"));
    };
    match command {
        Commands::Update(update_args) => update::run_update(update_args, debug).map(|_| ()),
        Commands::Extract(extract_args) => extract::run_extract(extract_args, debug).map(|_| ()),
        Commands::Cleanup(cleanup_args) => cleanup::run_cleanup(cleanup_args, debug).map(|_| ()),
    }
}
