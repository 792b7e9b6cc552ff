//! TW-Admin: Treewatch operator CLI
//!
//! Report rendering lives here so it runs against any `RecordStoreApi`. The
//! binary only opens the RocksDB directory and parses arguments.

use std::io::Write;

use anyhow::Result;
use clap::Subcommand;

use app_runtime::FlaggedView;
use tw_01_record_store::{RecordFilter, RecordStoreApi};

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Record counts by moderation status
    Summary,
    /// The moderation queue, oldest submission first
    Flagged,
    /// Distinct species of non-deleted records
    Species,
}

/// Write the report for `command` to `out`.
pub fn run(
    store: &impl RecordStoreApi,
    command: Command,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Summary => {
            let summary = store.summary()?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &summary)?;
                writeln!(out)?;
            } else {
                writeln!(out, "total    {}", summary.total)?;
                writeln!(out, "active   {}", summary.active)?;
                writeln!(out, "flagged  {}", summary.flagged)?;
                writeln!(out, "deleted  {}", summary.deleted)?;
            }
        }
        Command::Flagged => {
            let queue: Vec<FlaggedView> = store
                .list(&RecordFilter::FlaggedActive)?
                .iter()
                .map(FlaggedView::from)
                .collect();
            if json {
                serde_json::to_writer_pretty(&mut *out, &queue)?;
                writeln!(out)?;
            } else if queue.is_empty() {
                writeln!(out, "moderation queue is empty")?;
            } else {
                for entry in &queue {
                    let flagged_by = entry
                        .flagged_by
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    let flagged_at = entry
                        .flagged_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "-".to_string());
                    writeln!(
                        out,
                        "{}  {:<24} owner={} flagged_by={} at={} reason={:?}",
                        entry.id,
                        entry.species,
                        entry.submitted_by,
                        flagged_by,
                        flagged_at,
                        entry.flag_reason
                    )?;
                }
            }
        }
        Command::Species => {
            let species = store.species()?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &species)?;
                writeln!(out)?;
            } else {
                for name in species {
                    writeln!(out, "{name}")?;
                }
            }
        }
    }
    Ok(())
}
