//! # Version Keys and Catalogs
//!
//! Distribution releases are identified by short numeric tuples: Fedora uses a
//! single major (`"30"`), RHEL and CentOS use `major.minor` (`"8.4"`), with a
//! z-stream (`8.4.1`) as a finer level that never appears in catalog keys.
//!
//! `VersionKey` wraps those tuples so that equality and ordering are always
//! numeric (`7.10` sorts after `7.9`). It serializes as its canonical dotted
//! string so that a `Catalog` is written to disk as a plain JSON object of
//! version strings to URIs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An ordered tuple of non-negative integers naming a release.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionKey(Vec<u32>);

impl VersionKey {
    /// Build a key from its components, most significant first.
    pub fn new(components: Vec<u32>) -> Self {
        Self(components)
    }

    /// A single-level key such as Fedora's `30`.
    pub fn major(major: u32) -> Self {
        Self(vec![major])
    }

    /// A two-level key such as RHEL's `8.4`.
    pub fn minor(major: u32, minor: u32) -> Self {
        Self(vec![major, minor])
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// The most significant component, `0` for an empty key.
    pub fn major_component(&self) -> u32 {
        self.0.first().copied().unwrap_or(0)
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", component)?;
            first = false;
        }
        Ok(())
    }
}

/// Returned when a string is not a dotted list of integers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version key: {0:?}")]
pub struct ParseVersionKeyError(String);

impl FromStr for VersionKey {
    type Err = ParseVersionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseVersionKeyError(s.to_string()));
        }
        s.split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| ParseVersionKeyError(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(VersionKey)
    }
}

impl Serialize for VersionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Version key to repository root URI.
///
/// A `BTreeMap` keeps serialization deterministic: recomputing a catalog
/// from identical listings writes byte-identical JSON.
pub type Catalog = BTreeMap<VersionKey, String>;

/// A release-maturity channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Released,
    Latest,
    Nightly,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Released, Category::Latest, Category::Nightly];

    /// Name used in record file names and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Released => "released",
            Category::Latest => "latest",
            Category::Nightly => "nightly",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The oldest release a provider reports.
///
/// Releases with a lower major are discarded; when `minor` is set, releases
/// with exactly `major` must also reach that minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionFloor {
    pub major: u32,
    pub minor: Option<u32>,
}

impl VersionFloor {
    pub const fn major(major: u32) -> Self {
        Self { major, minor: None }
    }

    pub const fn minor(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor: Some(minor),
        }
    }

    /// Whether a release with these components is at or above the floor.
    pub fn admits(&self, components: &[u32]) -> bool {
        let Some(&major) = components.first() else {
            return false;
        };
        match major.cmp(&self.major) {
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Equal => match (self.minor, components.get(1)) {
                (Some(floor), Some(&minor)) => minor >= floor,
                // A bare major at the floor major carries no minor to check.
                _ => true,
            },
        }
    }

    /// First minor to probe for `major` when walking structured metadata.
    pub fn first_minor(&self, major: u32) -> u32 {
        if major == self.major {
            self.minor.unwrap_or(0)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_key_display() {
        assert_eq!(VersionKey::major(30).to_string(), "30");
        assert_eq!(VersionKey::minor(8, 4).to_string(), "8.4");
        assert_eq!(VersionKey::new(vec![7, 5, 2]).to_string(), "7.5.2");
    }

    #[test]
    fn test_version_key_parse() {
        assert_eq!("8.10".parse::<VersionKey>(), Ok(VersionKey::minor(8, 10)));
        assert!("".parse::<VersionKey>().is_err());
        assert!("8.x".parse::<VersionKey>().is_err());
        assert!("rawhide".parse::<VersionKey>().is_err());
    }

    #[test]
    fn test_version_key_ordering_is_numeric() {
        assert!(VersionKey::minor(7, 10) > VersionKey::minor(7, 9));
        assert!(VersionKey::major(100) > VersionKey::major(99));
    }

    #[test]
    fn test_catalog_serializes_as_string_keys() {
        let mut catalog = Catalog::new();
        catalog.insert(VersionKey::minor(8, 10), "http://b".to_string());
        catalog.insert(VersionKey::minor(8, 9), "http://a".to_string());

        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"{"8.9":"http://a","8.10":"http://b"}"#);

        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }

    #[test]
    fn test_catalog_rejects_non_numeric_keys() {
        assert!(serde_json::from_str::<Catalog>(r#"{"rawhide":"http://a"}"#).is_err());
    }

    #[test]
    fn test_floor_admits() {
        let rhel = VersionFloor::minor(7, 5);
        assert!(!rhel.admits(&[6, 10]));
        assert!(!rhel.admits(&[7, 4]));
        assert!(rhel.admits(&[7, 5]));
        assert!(rhel.admits(&[8, 0]));
        assert!(!rhel.admits(&[]));

        let fedora = VersionFloor::major(28);
        assert!(!fedora.admits(&[27]));
        assert!(fedora.admits(&[28]));
    }

    #[test]
    fn test_floor_first_minor() {
        let rhel = VersionFloor::minor(7, 5);
        assert_eq!(rhel.first_minor(7), 5);
        assert_eq!(rhel.first_minor(8), 0);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::Released.as_str(), "released");
        assert_eq!(Category::Nightly.to_string(), "nightly");
    }
}
