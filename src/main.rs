//! Fulcrum - breakpoint binding and program discovery core.
//!
//! Entry point for the host harness: parses arguments, sets up logging and
//! hands off to the REPL that drives the engine protocol.

use clap::Parser;
use fulcrum::cli::run_cli;

/// Fulcrum: native debug engine core harness
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    ))
    .init();

    log::info!("Fulcrum Core Initialized");

    println!("[*] Fulcrum v{} - Engine Harness", env!("CARGO_PKG_VERSION"));
    run_cli()
}
