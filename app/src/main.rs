//! Startpage - start page controller over stdin/stdout
//!
//! The frontend writes one JSON event per line and reads back one JSON
//! reply per line. Logs go to stderr.

mod bridge;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use startpage_core::{Config, Database, RecordingNavigator, StartPage};

use crate::bridge::Bridge;

#[derive(Parser, Debug)]
#[command(name = "startpage", version)]
#[command(about = "Start page controller speaking JSON lines on stdio")]
struct Args {
    /// Config file (JSON)
    #[arg(long, env = "STARTPAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Keep bookmarks and settings in memory only
    #[arg(long)]
    in_memory: bool,
}

fn main() -> Result<()> {
    startpage_core::init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let navigator = RecordingNavigator::new();
    let page = if args.in_memory {
        StartPage::with_database(&config, Database::open_in_memory()?, Box::new(navigator.clone()))?
    } else {
        StartPage::open(&config, Box::new(navigator.clone()))
            .with_context(|| format!("Failed to open {}", config.database_path.display()))?
    };

    tracing::info!(in_memory = args.in_memory, "Startpage started");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Bridge::new(page, navigator).run(stdin.lock(), stdout.lock())
}
