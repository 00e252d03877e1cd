//! # Listing Parser
//!
//! Turns the two kinds of raw discovery input into version candidates:
//!
//! 1. **Directory-listing markup.** Anchor tags are extracted with a
//!    case-insensitive pattern and only kept when the `href` value and the
//!    visible text are identical, which skips decorative links such as
//!    "Parent Directory" or sort-order toggles. A `DirectoryPattern` then
//!    recognizes the provider-specific directory names (`30/`, `rhel-8/`,
//!    `latest-RHEL-8.4.1/`, `released-RHEL-7/`, ...) and extracts their
//!    numeric components.
//!
//! 2. **Structured metadata entries.** `tree_root` filters distro trees to a
//!    variant and derives a repository root from the first URI found in the
//!    most preferred datacenter tier.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::metadata::DistroTree;

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s+href="([^"]*)"\s*>([^<]*)</a>"#).expect("anchor pattern is valid")
});

/// Names of every anchor whose `href` equals its visible text.
///
/// Comparison ignores ASCII case, matching the case-insensitive anchor
/// pattern.
pub fn anchors(markup: &str) -> Vec<&str> {
    ANCHOR
        .captures_iter(markup)
        .filter_map(|caps| {
            let href = caps.get(1)?.as_str();
            let text = caps.get(2)?.as_str();
            href.eq_ignore_ascii_case(text).then_some(href)
        })
        .collect()
}

/// Whether the listing has an anchor named `name` (e.g. `README` or `s390x/`).
pub fn has_entry(markup: &str, name: &str) -> bool {
    anchors(markup)
        .into_iter()
        .any(|anchor| anchor.eq_ignore_ascii_case(name))
}

/// A directory recognized by a `DirectoryPattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    /// Directory name without the trailing `/`.
    pub name: String,
    /// Numeric components, most significant first. An absent z-stream is
    /// simply not present.
    pub components: Vec<u32>,
}

/// Recognizes versioned directory names in listing markup.
#[derive(Debug, Clone)]
pub struct DirectoryPattern {
    regex: Regex,
}

impl DirectoryPattern {
    /// Build from a regex `stem` matching the directory name without its
    /// trailing slash; every capture group must be numeric.
    pub fn new(stem: &str) -> Result<Self> {
        let regex = Regex::new(&format!("(?i)^{}/$", stem))?;
        Ok(Self { regex })
    }

    /// Bare integer directories such as Fedora's `30/`.
    pub fn numeric() -> Result<Self> {
        Self::new(r"(\d+)")
    }

    /// `PREFIX-MAJOR/` directories such as `rhel-8/` or `centos-8/`.
    pub fn prefixed(prefix: &str) -> Result<Self> {
        Self::new(&format!(r"{}-(\d+)", regex::escape(prefix)))
    }

    /// `released-PREFIX-MAJOR/` marker directories.
    pub fn released_marker(prefix: &str) -> Result<Self> {
        Self::new(&format!(r"released-{}-(\d+)", regex::escape(prefix)))
    }

    /// `<lead>MAJOR.MINOR[.ZSTREAM]/` directories.
    ///
    /// With `major` set, only that major is recognized (the released
    /// `8.4.1/` layout below `RHEL-8/`); `lead` is a literal prefix such as
    /// `latest-RHEL-`.
    pub fn versioned(lead: &str, major: Option<u32>) -> Result<Self> {
        let major = major.map_or_else(|| r"\d+".to_string(), |m| m.to_string());
        Self::new(&format!(
            r"{}({})\.(\d+)(?:\.(\d+))?",
            regex::escape(lead),
            major
        ))
    }

    /// Every directory in `markup` matching this pattern, in listing order.
    pub fn directories(&self, markup: &str) -> Vec<Directory> {
        anchors(markup)
            .into_iter()
            .filter_map(|anchor| {
                let caps = self.regex.captures(anchor)?;
                let components = caps
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str().parse::<u32>().ok())
                    .collect::<Option<Vec<_>>>()?;
                Some(Directory {
                    name: anchor.trim_end_matches('/').to_string(),
                    components,
                })
            })
            .collect()
    }
}

/// Derive a repository root from structured metadata.
///
/// Trees are filtered to `variant`. Datacenter tiers are tried in order:
/// each suffix in `datacenters`, then any host. Within a tier the first tree
/// with a qualifying `http`/`https` URI wins, and the root is that URI with
/// its trailing `/<variant>/<arch>/os` removed.
pub fn tree_root(trees: &[DistroTree], variant: &str, datacenters: &[String]) -> Option<String> {
    let tiers = datacenters
        .iter()
        .map(|suffix| Some(suffix.as_str()))
        .chain(std::iter::once(None));

    for tier in tiers {
        for tree in trees.iter().filter(|tree| tree.variant == variant) {
            let suffix = format!("/{}/{}/os", variant, tree.arch);
            let found = tree.available.iter().find(|(host, uri)| {
                uri.starts_with("http") && tier.is_none_or(|dc| host.ends_with(dc))
            });
            if let Some((_, uri)) = found {
                let root = uri
                    .rsplit_once(suffix.as_str())
                    .map_or(uri.as_str(), |(head, _)| head);
                return Some(root.to_string());
            }
        }
    }
    None
}
