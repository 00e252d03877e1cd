//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use repo_roots::config::{self, Config};
use repo_roots::defaults::default_config_path;
use repo_roots::output::OutputConfig;
use repo_roots::suggestions;

use crate::commands;

/// Repo Roots - Find package repository roots for Fedora, RHEL and CentOS
#[derive(Parser, Debug)]
#[command(name = "repo-roots")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,

    /// Path to the configuration file
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        env = "REPO_ROOTS_CONFIG"
    )]
    config: Option<PathBuf>,

    /// Directory holding the on-disk catalog records
    #[arg(long, global = true, value_name = "DIR", env = "REPO_ROOTS_CACHE")]
    cache_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the available repository roots
    Roots(commands::roots::RootsArgs),

    /// Manage the on-disk catalog cache
    Cache(commands::cache::CacheArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Everything a command needs besides its own arguments.
pub struct Session {
    pub config_path: PathBuf,
    pub config: Config,
    pub output: OutputConfig,
}

impl Session {
    fn load(
        config_path: Option<PathBuf>,
        cache_root: Option<PathBuf>,
        color: &str,
    ) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(default_config_path);
        let mut config =
            config::load(&config_path).map_err(|e| suggestions::explain(e, &config_path))?;
        if let Some(root) = cache_root {
            config.cache_root = root;
        }
        Ok(Self {
            config_path,
            config,
            output: OutputConfig::from_env_and_flag(color),
        })
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let Cli {
            command,
            color,
            config,
            cache_root,
            ..
        } = self;

        match command {
            Commands::Roots(args) => {
                commands::roots::execute(args, Session::load(config, cache_root, &color)?)
            }
            Commands::Cache(args) => {
                commands::cache::execute(args, Session::load(config, cache_root, &color)?)
            }
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when embedded in tests.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
