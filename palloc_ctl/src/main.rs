//! # palloc Control Tool
//!
//! Creates the configured groups, applies their colour bins and prints the
//! resulting `bins` file of every group.
//!
//! # Usage
//!
//! ```bash
//! # Apply the configured groups
//! palloc_ctl --config /etc/palloc/palloc.toml
//!
//! # Override or add groups from the command line
//! palloc_ctl --config palloc.toml --set rt=0-15 --set batch=16-63
//!
//! # Verbose JSON logging
//! palloc_ctl --config palloc.toml -v --json
//! ```

#![deny(warnings)]

use clap::Parser;
use palloc_common::prelude::{ConfigLoader, PallocConfig};
use palloc_common::consts::DEFAULT_CONFIG_PATH;
use palloc_ctl::{ControlSession, CtlError, parse_assignment};
use std::path::PathBuf;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// palloc control tool - configure per-group colour bins
#[derive(Parser, Debug)]
#[command(name = "palloc_ctl")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Configure the colour bins each palloc group may allocate from")]
#[command(long_about = None)]
struct Args {
    /// Path to the palloc configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Set a group's bins, creating the group if needed (NAME=BINS, repeatable)
    #[arg(short, long = "set", value_name = "NAME=BINS", value_parser = parse_assignment, action = clap::ArgAction::Append)]
    sets: Vec<(String, String)>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run() {
        error!(errno = e.errno(), "palloc_ctl failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CtlError> {
    let args = Args::parse();

    let config = PallocConfig::load(&args.config);
    let level = match (&config, args.verbose) {
        (_, true) => Level::DEBUG,
        (Ok(config), false) => config.shared.log_level.into(),
        (Err(_), false) => Level::INFO,
    };
    setup_tracing(level, args.json);

    info!("palloc_ctl v{} starting...", env!("CARGO_PKG_VERSION"));
    let config = config?;
    info!("Loaded {} groups from {}", config.groups.len(), args.config.display());

    let mut session = ControlSession::from_config(&config)?;
    for (name, bins) in &args.sets {
        session.create_group(name)?;
        session.set_bins(name, bins)?;
    }

    for line in session.report()? {
        println!("{line}");
    }
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
///
/// Logs go to stderr; stdout carries only the group report.
fn setup_tracing(level: Level, json: bool) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
