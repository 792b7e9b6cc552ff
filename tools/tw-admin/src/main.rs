//! TW-Admin binary
//!
//! Reads the RocksDB data directory directly. RocksDB allows one process
//! per directory, so stop the `treewatch` service first.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use app_runtime::adapters::storage::{RocksDbConfig, RocksDbStore};
use shared_types::SystemTimeSource;
use tw_01_record_store::{RecordStoreConfig, RecordStoreService};
use tw_admin::{run, Command};

/// TW-Admin: Treewatch operator CLI
#[derive(Parser, Debug)]
#[command(name = "tw-admin")]
#[command(about = "Inspect moderation state in a Treewatch data directory")]
struct Args {
    /// Data directory of the treewatch service
    #[arg(short, long, env = "TREEWATCH_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

type Store = RecordStoreService<RocksDbStore, SystemTimeSource>;

fn open(data_dir: &Path) -> Result<Store> {
    let path = data_dir.join("rocksdb");
    if !path.exists() {
        anyhow::bail!("no database at {}", path.display());
    }
    debug!(path = %path.display(), "opening database");
    let kv = RocksDbStore::open(RocksDbConfig {
        path: path.clone(),
        sync_writes: false,
        ..Default::default()
    })
    .with_context(|| format!("failed to open {}", path.display()))?;
    Ok(RecordStoreService::new(
        kv,
        SystemTimeSource,
        RecordStoreConfig::default(),
    ))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let store = open(&args.data_dir)?;
    let stdout = io::stdout();
    run(&store, args.command, args.json, &mut stdout.lock())
}
