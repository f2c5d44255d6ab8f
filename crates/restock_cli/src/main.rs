//! Command-line driver for the restock catalog.
//!
//! # Responsibility
//! - Expose the feed operations (list, add, delete, import) over one
//!   SQLite database file.
//! - Keep output deterministic for quick local sanity checks.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use restock_core::{default_log_level, init_logging, ProductFeed, Store, StubProductApi};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "restock")]
#[command(version = restock_core::core_version())]
#[command(about = "Product catalog store with batch import")]
struct Args {
    /// Path of the catalog database file (created when missing)
    #[arg(long)]
    db: PathBuf,

    /// Directory for rolling log files; logging is off when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the catalog ordered by name
    List,
    /// Add one "Coffee" record with a fresh serial code
    Add,
    /// Delete the records at the given offsets of the sorted listing
    Delete { offsets: Vec<usize> },
    /// Import the simulated remote catalog
    Import,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_dir) = &args.log_dir {
        let log_dir = absolute_path(log_dir)?;
        init_logging(default_log_level(), &log_dir.to_string_lossy())
            .map_err(anyhow::Error::msg)?;
    }

    let store = Store::open(&args.db)
        .with_context(|| format!("failed to open catalog at {}", args.db.display()))?;
    let mut feed = ProductFeed::new(store)?;

    match args.command {
        Command::List => {}
        Command::Add => {
            let product = feed.add_product()?;
            println!("added {} ({})", product.name, product.serial_code);
        }
        Command::Delete { offsets } => {
            let removed = feed.delete_products(&offsets)?;
            println!("deleted {removed} product(s)");
        }
        Command::Import => {
            let report = feed.import_products(&StubProductApi::new()).await?;
            println!(
                "imported {} of {} record(s)",
                report.applied, report.received
            );
        }
    }

    print_catalog(&feed);
    Ok(())
}

fn print_catalog(feed: &ProductFeed) {
    if feed.is_empty() {
        println!("catalog is empty");
        return;
    }
    for (offset, product) in feed.products().iter().enumerate() {
        println!("{offset:>3}  {}  {}", product.name, product.serial_code);
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}
