//! # Structured Metadata
//!
//! Released roots are looked up first through an external inventory tool
//! (Beaker's `bkr distro-trees-list`), which is much faster than crawling
//! directory listings. The tool is run as a child process, the same way the
//! system `git` is driven elsewhere in the ecosystem: whatever credentials
//! and configuration the user already has for it apply automatically.
//!
//! Exit status contract:
//!
//! - `0`: JSON array of distro trees on stdout.
//! - `1`: no tree matches the family/name. This ends an enumeration walk and
//!   is reported as `TreeLookup::NoDistroTree`, not as an error.
//! - anything else: `Error::MetadataTool`.
//! - executable not found: `TreeLookup::ToolMissing`. `DistroTrees` then
//!   stops asking for the rest of its lifetime and callers scrape instead.

use std::io::ErrorKind;
use std::process::Command;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::listing;

/// Default program name for the inventory tool.
pub const DEFAULT_COMMAND: &str = "bkr";

/// One distro tree as reported by the inventory tool.
///
/// Unknown fields in the tool's output are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistroTree {
    pub variant: String,
    pub arch: String,
    /// `(lab controller hostname, URI)` pairs.
    #[serde(default)]
    pub available: Vec<(String, String)>,
}

/// Outcome of one inventory query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeLookup {
    Trees(Vec<DistroTree>),
    NoDistroTree,
    ToolMissing,
}

/// Trait for distro tree queries - allows faking the inventory tool in tests
pub trait DistroTreeQuery {
    /// Name of the underlying tool, for log and error messages.
    fn tool(&self) -> &str;

    /// Query trees for `family`, optionally narrowed to one exact `name`.
    fn query(&self, family: &str, name: Option<&str>) -> Result<TreeLookup>;
}

/// Runs the real `bkr` executable.
#[derive(Debug, Clone)]
pub struct BeakerCommand {
    program: String,
}

impl BeakerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for BeakerCommand {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

impl DistroTreeQuery for BeakerCommand {
    fn tool(&self) -> &str {
        &self.program
    }

    fn query(&self, family: &str, name: Option<&str>) -> Result<TreeLookup> {
        let mut command = Command::new(&self.program);
        command.args(["distro-trees-list", "--family", family]);
        if let Some(name) = name {
            command.args(["--name", name]);
        }
        command.args(["--format", "json"]);

        debug!("{} distro-trees-list --family {} --name {:?}", self.program, family, name);
        let output = match command.output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TreeLookup::ToolMissing),
            Err(e) => {
                return Err(Error::MetadataTool {
                    tool: self.program.clone(),
                    message: e.to_string(),
                })
            }
        };

        match output.status.code() {
            Some(0) => {
                let trees: Vec<DistroTree> =
                    serde_json::from_slice(&output.stdout).map_err(|e| Error::MetadataTool {
                        tool: self.program.clone(),
                        message: format!("unreadable output: {}", e),
                    })?;
                Ok(TreeLookup::Trees(trees))
            }
            Some(1) => Ok(TreeLookup::NoDistroTree),
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let code = code.map_or_else(|| "none (killed by signal)".to_string(), |c| c.to_string());
                Err(Error::MetadataTool {
                    tool: self.program.clone(),
                    message: format!("unexpected failure; return code = {}: {}", code, stderr.trim()),
                })
            }
        }
    }
}

/// Result of resolving one distro tree to a repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootLookup {
    /// The tree exists; the root is `None` when no entry had a usable URI.
    Found(Option<String>),
    /// No tree for this family/name: the enumeration is exhausted.
    Exhausted,
    /// The tool is not installed; scrape instead.
    Unavailable,
}

/// Root-level view over a `DistroTreeQuery`, remembering tool absence.
pub struct DistroTrees {
    query: Box<dyn DistroTreeQuery>,
    datacenters: Vec<String>,
    missing: bool,
}

impl DistroTrees {
    pub fn new(query: Box<dyn DistroTreeQuery>, datacenters: Vec<String>) -> Self {
        Self {
            query,
            datacenters,
            missing: false,
        }
    }

    /// Whether the tool is still believed to be installed.
    pub fn is_available(&self) -> bool {
        !self.missing
    }

    /// Resolve the root for one exact tree name and variant.
    pub fn root(&mut self, family: &str, name: &str, variant: &str) -> Result<RootLookup> {
        if self.missing {
            return Ok(RootLookup::Unavailable);
        }
        match self.query.query(family, Some(name))? {
            TreeLookup::Trees(trees) => Ok(RootLookup::Found(listing::tree_root(
                &trees,
                variant,
                &self.datacenters,
            ))),
            TreeLookup::NoDistroTree => Ok(RootLookup::Exhausted),
            TreeLookup::ToolMissing => {
                warn!(
                    "{} not found; falling back to directory listings",
                    self.query.tool()
                );
                self.missing = true;
                Ok(RootLookup::Unavailable)
            }
        }
    }
}
