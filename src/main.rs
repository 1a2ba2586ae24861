use clap::{CommandFactory, Parser};
use std::process;
use synop_monitor::cli::{args::Args, commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    // The debug switch is captured exactly once, here, and flows into the
    // log filter and the runtime configuration.
    let default_filter = if args.debug {
        "synop_monitor=debug"
    } else {
        "synop_monitor=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // No subcommand: show help and the available commands
    if args.command.is_none() {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
