//! CPU architecture choices.
//!
//! Providers only need two facts about an architecture: its name (used in
//! indicator paths) and whether Fedora ships it from the secondary mirror
//! tree. `Architectures` supplies those plus the default choice.

use std::fmt;

use crate::error::{Error, Result};

/// Default architecture when neither the caller nor the configuration picks one.
pub const DEFAULT_ARCHITECTURE: &str = "x86_64";

const KNOWN: &[&str] = &["x86_64", "aarch64", "ppc64le", "s390x"];
const FEDORA_SECONDARY: &[&str] = &["s390x"];

/// A resolved architecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Architecture {
    name: String,
    secondary: bool,
}

impl Architecture {
    pub fn new(name: impl Into<String>, secondary: bool) -> Self {
        Self {
            name: name.into(),
            secondary,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether Fedora publishes this architecture under `fedora-secondary`.
    pub fn is_secondary(&self) -> bool {
        self.secondary
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Trait for architecture knowledge - allows tests to supply their own set
pub trait Architectures {
    fn default_architecture(&self) -> &str;

    fn is_secondary(&self, name: &str) -> bool;

    fn choices(&self) -> Vec<String>;

    /// Resolve `name` (or the default when `None`) to an `Architecture`.
    fn resolve(&self, name: Option<&str>) -> Result<Architecture> {
        let name = name.unwrap_or_else(|| self.default_architecture());
        let canonical = self
            .choices()
            .into_iter()
            .find(|choice| choice.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownArchitecture {
                name: name.to_string(),
            })?;
        let secondary = self.is_secondary(&canonical);
        Ok(Architecture::new(canonical, secondary))
    }
}

/// The architectures the supported distributions build for.
#[derive(Debug, Clone)]
pub struct KnownArchitectures {
    default: String,
}

impl KnownArchitectures {
    pub fn new() -> Self {
        Self {
            default: DEFAULT_ARCHITECTURE.to_string(),
        }
    }

    /// Use `name` as the default choice; it must be a known architecture.
    pub fn with_default(name: &str) -> Result<Self> {
        let default = KNOWN
            .iter()
            .find(|known| known.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownArchitecture {
                name: name.to_string(),
            })?;
        Ok(Self {
            default: default.to_string(),
        })
    }
}

impl Default for KnownArchitectures {
    fn default() -> Self {
        Self::new()
    }
}

impl Architectures for KnownArchitectures {
    fn default_architecture(&self) -> &str {
        &self.default
    }

    fn is_secondary(&self, name: &str) -> bool {
        FEDORA_SECONDARY
            .iter()
            .any(|secondary| secondary.eq_ignore_ascii_case(name))
    }

    fn choices(&self) -> Vec<String> {
        KNOWN.iter().map(|name| name.to_string()).collect()
    }
}
