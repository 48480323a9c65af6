//! WARP Charger Artifact Viewer CLI
//!
//! Command-line front end for the vislog-decoder library. Reads an
//! uploaded charge log or debug report, decodes it, and prints either a
//! human-readable summary or the full record as JSON (the form an HTTP
//! rendering layer would consume).

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod render;

/// Decode WARP charger charge logs and debug reports
#[derive(Parser, Debug)]
#[command(name = "vislog-cli")]
#[command(about = "Decode WARP charger charge logs and debug reports", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the uploaded charge log or debug report
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the full decoded record as pretty JSON
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("vislog CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", vislog_decoder::VERSION);

    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read artifact {:?}", args.file))?;

    let decoded = vislog_decoder::decode_artifact(&raw)
        .with_context(|| format!("not a recognizable artifact: {:?}", args.file))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    } else {
        render::print_summary(&decoded);
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
