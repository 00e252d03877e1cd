//! # Repo Roots CLI
//!
//! This is the binary entry point for the `repo-roots` command-line tool.
//!
//! It parses arguments with `clap` and dispatches to a command. Discovery,
//! caching and rendering all live in the `repo_roots` library; the binary
//! only wires them to flags and stdout.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
