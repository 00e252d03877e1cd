//! # Cache Command Implementation
//!
//! This module implements the `cache` subcommand, which inspects and prunes
//! the on-disk catalog records.
//!
//! ## Subcommands
//!
//! - **`list`**: Display every record with its age and freshness
//! - **`clean`**: Remove records (`--all` or `--stale`, optionally per `--provider`)

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use repo_roots::cache::{CatalogStore, Record};
use repo_roots::provider::ProviderKind;
use repo_roots::suggestions;

use crate::cli::Session;

/// Manage the on-disk catalog cache
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: CacheSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CacheSubcommand {
    /// List all cached records
    List(ListArgs),
    /// Remove cached records
    Clean(CleanArgs),
}

/// Arguments for the cache list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the cache clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Show what would be deleted without actually deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Delete every record
    #[arg(long)]
    pub all: bool,

    /// Delete records past the TTL or whose content does not parse
    #[arg(long)]
    pub stale: bool,

    /// Only consider records of this provider
    #[arg(short, long, value_name = "NAME")]
    pub provider: Option<String>,
}

/// Execute the `cache` command.
pub fn execute(args: CacheArgs, session: Session) -> Result<()> {
    let store = CatalogStore::new(
        session.config.cache_root.clone(),
        session.config.ttl(),
        false,
    );
    match args.command {
        CacheSubcommand::List(list_args) => execute_list(&store, list_args),
        CacheSubcommand::Clean(clean_args) => execute_clean(&store, clean_args),
    }
}

/// Execute the `cache list` command.
fn execute_list(store: &CatalogStore, args: ListArgs) -> Result<()> {
    let records = store
        .records()
        .with_context(|| format!("Failed to scan cache at {}", store.root().display()))?;

    if args.json {
        display_json(&records)?;
    } else if records.is_empty() {
        println!("No cached records found in: {}", store.root().display());
    } else {
        display_table(&records);
    }

    Ok(())
}

/// Execute the `cache clean` command.
fn execute_clean(store: &CatalogStore, args: CleanArgs) -> Result<()> {
    if !args.all && !args.stale {
        return Err(suggestions::cache_clean_no_filter());
    }

    let provider = match &args.provider {
        Some(name) => Some(
            name.parse::<ProviderKind>()
                .map_err(|_| suggestions::unknown_provider(name))?,
        ),
        None => None,
    };

    let records = store
        .records()
        .with_context(|| format!("Failed to scan cache at {}", store.root().display()))?;
    let doomed = select_for_cleanup(&records, &args, provider);

    if doomed.is_empty() {
        println!("No cached records match the specified criteria.");
        return Ok(());
    }

    println!("Records to be deleted:\n");
    for record in &doomed {
        println!("  {}/{} ({})", record.provider, record.name, format_age(record.age));
    }
    println!("\nTotal: {} records", doomed.len());

    if args.dry_run {
        println!("\nDry run mode - no changes were made.");
        return Ok(());
    }

    let mut failed = 0;
    for record in &doomed {
        if let Err(e) = store.remove(record) {
            failed += 1;
            eprintln!("  Failed to delete {}: {}", record.path.display(), e);
        }
    }

    println!("\nDeleted {} records.", doomed.len() - failed);
    if failed > 0 {
        anyhow::bail!("Failed to delete {} records", failed);
    }
    Ok(())
}

/// Records matching the clean filters.
fn select_for_cleanup<'a>(
    records: &'a [Record],
    args: &CleanArgs,
    provider: Option<ProviderKind>,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|record| provider.is_none_or(|kind| record.provider == kind.name()))
        .filter(|record| args.all || (args.stale && !record.fresh))
        .collect()
}

fn display_table(records: &[Record]) {
    println!("Cached records:\n");
    println!(
        "{:<10} {:<28} {:>8} {:>10} {:<6}",
        "PROVIDER", "RECORD", "ENTRIES", "AGE", "STATE"
    );
    println!("{}", "-".repeat(66));

    for record in records {
        let entries = record
            .entries
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{:<10} {:<28} {:>8} {:>10} {:<6}",
            record.provider,
            record.name,
            entries,
            format_age(record.age),
            if record.fresh { "fresh" } else { "stale" }
        );
    }

    println!("\nTotal: {} cached records", records.len());
}

fn display_json(records: &[Record]) -> Result<()> {
    let entries: Vec<serde_json::Value> = records
        .iter()
        .map(|record| {
            json!({
                "provider": record.provider,
                "name": record.name,
                "path": record.path.display().to_string(),
                "age_secs": record.age.as_secs(),
                "entries": record.entries,
                "fresh": record.fresh,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

/// Coarse human-readable age: the two largest non-zero units, e.g. `3h 12m`
/// or `1d 5m`.
fn format_age(age: Duration) -> String {
    const UNITS: [(&str, u64); 4] = [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)];

    let mut remaining = age.as_secs();
    let mut parts = Vec::new();
    for (suffix, size) in UNITS {
        let count = remaining / size;
        if count > 0 || (parts.is_empty() && size == 1) {
            parts.push(format!("{}{}", count, suffix));
            remaining -= count * size;
        }
        if parts.len() == 2 {
            break;
        }
    }
    parts.join(" ")
}
