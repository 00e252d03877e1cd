//! # Roots Command Implementation
//!
//! This module implements the `roots` subcommand, which prints the merged
//! repository roots of every selected provider and architecture.
//!
//! ## Views
//!
//! - **`--released`**: released roots win over latest and nightly
//! - **`--latest`**: latest composes win over released and nightly
//! - **`--nightly`**: nightly composes win over latest and released
//!
//! The flags combine. Without any of them every view is printed.
//!
//! ## Example
//!
//! ```bash
//! # Every provider, every architecture
//! repo-roots roots
//!
//! # RHEL latest composes for two architectures, bypassing fresh records
//! repo-roots roots --provider rhel --arch x86_64 --arch aarch64 --latest --rescan
//! ```

use anyhow::Result;
use clap::Args;
use log::debug;

use repo_roots::architecture::{Architectures, KnownArchitectures};
use repo_roots::merge::View;
use repo_roots::output::{render_sections, Format, Section};
use repo_roots::provider::ProviderKind;
use repo_roots::repository::RootsRepository;
use repo_roots::suggestions;

use crate::cli::Session;

/// Print available repository roots
#[derive(Args, Debug)]
pub struct RootsArgs {
    /// Provider to query (Fedora, RHEL, CentOS); repeatable, defaults to all
    #[arg(short, long = "provider", value_name = "NAME")]
    pub providers: Vec<String>,

    /// Architecture to query; repeatable, defaults to all known architectures
    #[arg(short, long = "arch", value_name = "ARCH")]
    pub architectures: Vec<String>,

    /// Print the view preferring released roots
    #[arg(long)]
    pub released: bool,

    /// Print the view preferring latest composes
    #[arg(long)]
    pub latest: bool,

    /// Print the view preferring nightly composes
    #[arg(long)]
    pub nightly: bool,

    /// Recompute every record instead of serving fresh ones from disk
    #[arg(long)]
    pub rescan: bool,

    /// Output format (yaml, json)
    #[arg(long, value_name = "FORMAT", default_value = "yaml")]
    pub format: Format,
}

impl RootsArgs {
    fn views(&self) -> Vec<View> {
        if !(self.released || self.latest || self.nightly) {
            return View::ALL.to_vec();
        }
        let mut views = Vec::new();
        if self.released {
            views.push(View::Released);
        }
        if self.latest {
            views.push(View::Latest);
        }
        if self.nightly {
            views.push(View::Nightly);
        }
        views
    }

    fn provider_kinds(&self) -> Result<Vec<ProviderKind>> {
        if self.providers.is_empty() {
            return Ok(ProviderKind::ALL.to_vec());
        }
        let mut kinds = Vec::new();
        for name in &self.providers {
            let kind: ProviderKind = name
                .parse()
                .map_err(|_| suggestions::unknown_provider(name))?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }

    fn architecture_names(&self) -> Result<Vec<String>> {
        let known = KnownArchitectures::new();
        if self.architectures.is_empty() {
            return Ok(known.choices());
        }
        let mut names = Vec::new();
        for name in &self.architectures {
            let arch = known
                .resolve(Some(name))
                .map_err(|_| suggestions::unknown_architecture(name))?;
            let canonical = arch.name().to_string();
            if !names.contains(&canonical) {
                names.push(canonical);
            }
        }
        Ok(names)
    }
}

/// Execute the `roots` command.
pub fn execute(args: RootsArgs, session: Session) -> Result<()> {
    let Session {
        config_path,
        mut config,
        output,
    } = session;
    config.rescan = args.rescan;

    let views = args.views();
    let kinds = args.provider_kinds()?;
    let architectures = args.architecture_names()?;

    let mut sections = Vec::new();
    for kind in kinds {
        let mut repository = RootsRepository::new(kind, &config)
            .map_err(|e| suggestions::explain(e, &config_path))?;
        for arch in &architectures {
            for view in &views {
                debug!("querying {} {} {}", kind, arch, view);
                let roots = repository
                    .view(*view, Some(arch))
                    .map_err(|e| suggestions::explain(e, &config_path))?;
                sections.push(Section {
                    provider: kind.name().to_string(),
                    architecture: arch.clone(),
                    view: view.to_string(),
                    roots,
                });
            }
        }
    }

    println!("{}", render_sections(&output, &sections, args.format)?);
    Ok(())
}
