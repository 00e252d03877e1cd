//! # Provider Strategies
//!
//! One strategy per distribution family. A strategy knows where its family
//! publishes listings, how its directories are named, which version floor
//! applies, how to query structured metadata, and how to tell whether a
//! root carries a given architecture. Everything else (caching, merging,
//! default architectures) lives in `RootsRepository` and is shared.
//!
//! Strategies are stateless; the network and metadata collaborators they
//! use are passed in through `Sources`, which the repository owns.

mod centos;
mod fedora;
mod rhel;

use std::fmt;
use std::str::FromStr;

use crate::architecture::Architecture;
use crate::config::{Config, Hosts};
use crate::error::{Error, Result};
use crate::listing;
use crate::metadata::{DistroTreeQuery, DistroTrees, RootLookup};
use crate::transport::{Transport, UriFetcher};
use crate::version::{Catalog, Category, VersionFloor, VersionKey};

pub use centos::CentOs;
pub use fedora::Fedora;
pub use rhel::Rhel;

/// The network and metadata collaborators a strategy reads from.
pub struct Sources {
    pub fetcher: UriFetcher,
    pub trees: DistroTrees,
    pub scheme: String,
    pub hosts: Hosts,
}

impl Sources {
    pub fn new(
        transport: Box<dyn Transport>,
        query: Box<dyn DistroTreeQuery>,
        config: &Config,
    ) -> Self {
        Self {
            fetcher: UriFetcher::new(transport, config.timeout(), config.retries),
            trees: DistroTrees::new(query, config.datacenters.clone()),
            scheme: config.scheme.clone(),
            hosts: config.hosts.clone(),
        }
    }

    /// Absolute URI for `path` on `host`.
    pub fn uri(&self, host: &str, path: &str) -> String {
        format!("{}://{}{}", self.scheme, host, path)
    }

    /// Listing markup of the directory `path` on `host`.
    pub fn listing(&mut self, host: &str, path: &str) -> Result<String> {
        let uri = self.uri(host, &format!("{}/", path.trim_end_matches('/')));
        self.fetcher.fetch(&uri)
    }
}

/// Where to look to decide whether a root carries an architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchitectureIndicator {
    /// The listing at `uri` must be non-empty.
    NonEmpty { uri: String },
    /// The listing at `uri` must contain an anchor named `anchor`.
    Anchor { uri: String, anchor: String },
}

/// Identity of a distribution family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    Fedora,
    Rhel,
    CentOs,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [ProviderKind::Fedora, ProviderKind::Rhel, ProviderKind::CentOs];

    /// Display name, also the record directory name.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Fedora => "Fedora",
            ProviderKind::Rhel => "RHEL",
            ProviderKind::CentOs => "CentOS",
        }
    }

    /// The strategy implementing this family.
    pub fn strategy(&self) -> Box<dyn Provider> {
        match self {
            ProviderKind::Fedora => Box::new(Fedora),
            ProviderKind::Rhel => Box::new(Rhel),
            ProviderKind::CentOs => Box::new(CentOs),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownProvider {
                name: s.to_string(),
            })
    }
}

/// Per-family discovery strategy.
pub trait Provider {
    fn kind(&self) -> ProviderKind;

    /// Oldest release reported.
    fn floor(&self) -> VersionFloor;

    /// The category whose result stands in for `category`.
    ///
    /// Families without a separate channel (e.g. no nightly composes) alias
    /// it to another category instead of computing it twice.
    fn alias(&self, category: Category) -> Category {
        category
    }

    /// Whether `category` is looked up through structured metadata first.
    fn supports_structured_metadata(&self, category: Category) -> bool {
        category == Category::Released
    }

    /// Record name for the architecture-agnostic catalog of `category`.
    ///
    /// Families whose listing source depends on the architecture include
    /// that distinction here so that unrelated listings never share a record.
    fn record_key(&self, category: Category, _arch: &Architecture) -> String {
        category.as_str().to_string()
    }

    /// Compute the architecture-agnostic catalog for `category`.
    fn find_agnostic(
        &self,
        category: Category,
        arch: &Architecture,
        sources: &mut Sources,
    ) -> Result<Catalog>;

    /// Location proving that `root` (for `key`) carries `arch`.
    fn architecture_indicator(
        &self,
        key: &VersionKey,
        root: &str,
        arch: &Architecture,
    ) -> ArchitectureIndicator;

    /// Whether `root` carries `arch`.
    fn has_architecture(
        &self,
        key: &VersionKey,
        root: &str,
        arch: &Architecture,
        sources: &mut Sources,
    ) -> Result<bool> {
        match self.architecture_indicator(key, root, arch) {
            ArchitectureIndicator::NonEmpty { uri } => Ok(!sources.fetcher.fetch(&uri)?.is_empty()),
            ArchitectureIndicator::Anchor { uri, anchor } => {
                Ok(listing::has_entry(&sources.fetcher.fetch(&uri)?, &anchor))
            }
        }
    }
}

/// A structured metadata request for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRequest {
    pub family: String,
    pub name: String,
    pub variant: &'static str,
}

/// Walk majors upward from the floor, one query per major.
///
/// The walk ends at the first major without a distro tree. Returns `None`
/// when the metadata tool is unavailable.
pub(crate) fn walk_majors(
    trees: &mut DistroTrees,
    floor: VersionFloor,
    request: impl Fn(u32) -> TreeRequest,
) -> Result<Option<Catalog>> {
    let mut catalog = Catalog::new();
    let mut major = floor.major;
    loop {
        let TreeRequest {
            family,
            name,
            variant,
        } = request(major);
        match trees.root(&family, &name, variant)? {
            RootLookup::Unavailable => return Ok(None),
            RootLookup::Exhausted => break,
            RootLookup::Found(Some(root)) => {
                catalog.insert(VersionKey::major(major), root);
            }
            RootLookup::Found(None) => {}
        }
        major += 1;
    }
    Ok(Some(catalog))
}

/// Walk `major.minor` releases upward from the floor.
///
/// Within a major, minors are queried until one has no distro tree. If that
/// happens at minor `0`, the majors are exhausted too and the walk ends;
/// otherwise it continues with the next major at minor `0`.
/// Returns `None` when the metadata tool is unavailable.
pub(crate) fn walk_minors(
    trees: &mut DistroTrees,
    floor: VersionFloor,
    request: impl Fn(u32, u32) -> TreeRequest,
) -> Result<Option<Catalog>> {
    let mut catalog = Catalog::new();
    let mut major = floor.major;
    loop {
        let mut minor = floor.first_minor(major);
        loop {
            let TreeRequest {
                family,
                name,
                variant,
            } = request(major, minor);
            match trees.root(&family, &name, variant)? {
                RootLookup::Unavailable => return Ok(None),
                RootLookup::Exhausted => break,
                RootLookup::Found(Some(root)) => {
                    catalog.insert(VersionKey::minor(major, minor), root);
                }
                RootLookup::Found(None) => {}
            }
            minor += 1;
        }
        if minor == 0 {
            break;
        }
        major += 1;
    }
    Ok(Some(catalog))
}
