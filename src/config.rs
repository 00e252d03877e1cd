//! # Configuration
//!
//! repo-roots reads an optional YAML file (by default
//! `<config dir>/repo-roots/config.yaml`). Every key is optional and falls
//! back to the built-in default, so an absent file is equivalent to an empty
//! one:
//!
//! ```yaml
//! cache-root: /var/cache/repo-roots
//! ttl-hours: 24
//! timeout-secs: 10
//! retries: 3
//! scheme: http
//! default-architecture: x86_64
//! metadata-command: bkr
//! datacenters:
//!   - bos.redhat.com
//!   - rdu.redhat.com
//! hosts:
//!   fedora: dl.fedoraproject.org
//!   fedora-archive: archives.fedoraproject.org
//!   rhel: download.eng.bos.redhat.com
//!   centos: download.eng.bos.redhat.com
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::metadata;
use crate::transport;

const KNOWN_KEYS: &str = "cache-root, ttl-hours, timeout-secs, retries, scheme, \
default-architecture, metadata-command, datacenters, hosts";

/// Host names serving the directory listings of each provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Hosts {
    pub fedora: String,
    /// Where Fedora releases move once they reach end of life.
    pub fedora_archive: String,
    pub rhel: String,
    pub centos: String,
}

impl Default for Hosts {
    fn default() -> Self {
        Self {
            fedora: "dl.fedoraproject.org".to_string(),
            fedora_archive: "archives.fedoraproject.org".to_string(),
            rhel: "download.eng.bos.redhat.com".to_string(),
            centos: "download.eng.bos.redhat.com".to_string(),
        }
    }
}

/// Runtime configuration for discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding one subdirectory of catalog records per provider.
    pub cache_root: PathBuf,
    /// Age after which an on-disk record is recomputed.
    pub ttl_hours: u64,
    /// Per-attempt network timeout.
    pub timeout_secs: u64,
    /// Attempts per URI for DNS failures and timeouts.
    pub retries: u32,
    /// URI scheme used for listing hosts.
    pub scheme: String,
    /// Overrides the built-in default architecture.
    pub default_architecture: Option<String>,
    pub metadata_command: String,
    /// Lab controller hostname suffixes, most preferred first.
    pub datacenters: Vec<String>,
    pub hosts: Hosts,
    /// Ignore fresh on-disk records and recompute everything.
    #[serde(skip)]
    pub rescan: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_root: defaults::default_cache_root(),
            ttl_hours: 24,
            timeout_secs: transport::DEFAULT_TIMEOUT.as_secs(),
            retries: transport::DEFAULT_RETRIES,
            scheme: "http".to_string(),
            default_architecture: None,
            metadata_command: metadata::DEFAULT_COMMAND.to_string(),
            datacenters: vec!["bos.redhat.com".to_string(), "rdu.redhat.com".to_string()],
            hosts: Hosts::default(),
            rescan: false,
        }
    }
}

impl Config {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(3600))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Parse configuration YAML. Empty input yields the defaults.
pub fn parse(yaml_content: &str) -> Result<Config> {
    if yaml_content.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(yaml_content).map_err(|e| {
        let message = e.to_string();
        let hint = hint_for(&message);
        Error::ConfigParse { message, hint }
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from `path`; a missing file yields the defaults.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

fn hint_for(message: &str) -> Option<String> {
    if message.contains("unknown field") {
        Some(format!("valid keys are: {}", KNOWN_KEYS))
    } else if message.contains("invalid type") {
        Some("ttl-hours, timeout-secs and retries take whole numbers".to_string())
    } else {
        None
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.scheme != "http" && config.scheme != "https" {
        return Err(Error::ConfigParse {
            message: format!("unsupported scheme: {}", config.scheme),
            hint: Some("scheme must be http or https".to_string()),
        });
    }
    if config.retries == 0 {
        return Err(Error::ConfigParse {
            message: "retries must be at least 1".to_string(),
            hint: None,
        });
    }
    if config.timeout_secs == 0 {
        return Err(Error::ConfigParse {
            message: "timeout-secs must be at least 1".to_string(),
            hint: None,
        });
    }
    Ok(())
}
