//! Mote Text Editor
//!
//! A minimal terminal text editor built from scratch.
//!
//! # Usage
//!
//! ```bash
//! # Open a file
//! mote notes.txt
//!
//! # Start with an empty buffer
//! mote
//!
//! # Use an explicit config file
//! mote --config mote.json notes.txt
//! ```
//!
//! Tracing output goes to stderr; redirect it when enabling diagnostics
//! (`RUST_LOG=debug mote file.txt 2>mote.log`), since stderr shares the
//! raw-mode terminal with the editor itself.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mote::config::Config;
use mote::editor;

/// Command-line arguments
#[derive(Debug, Default)]
struct Args {
    /// File to edit (empty buffer if not specified)
    file: Option<PathBuf>,
    /// Explicit config file path
    config: Option<PathBuf>,
    /// Show help
    help: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => {
                args.help = true;
            }
            "-c" | "--config" => {
                i += 1;
                if i < argv.len() {
                    args.config = Some(PathBuf::from(&argv[i]));
                }
            }
            other => {
                if args.file.is_none() {
                    args.file = Some(PathBuf::from(other));
                }
            }
        }
        i += 1;
    }

    args
}

fn print_usage() {
    println!("mote - a minimal terminal text editor");
    println!();
    println!("USAGE:");
    println!("    mote [OPTIONS] [FILE]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>    Use an explicit config file");
    println!("    -h, --help             Show this help");
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = parse_args();
    if args.help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("mote: bad config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::load_or_default(),
    };

    match editor::run(args.file, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Raw mode is already restored by the guard's drop.
            tracing::error!("fatal: {}", e);
            eprintln!("mote: {}", e);
            ExitCode::FAILURE
        }
    }
}
