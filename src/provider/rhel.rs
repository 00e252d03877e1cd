//! RHEL: `major.minor` version keys with z-streams underneath.
//!
//! Released roots come from structured metadata when the inventory tool is
//! installed, otherwise from the `/released/` tree. Latest and nightly
//! composes are published per major under `/rhel-<major>/rel-eng/` and
//! `/rhel-<major>/nightly/` respectively.

use super::{walk_minors, ArchitectureIndicator, Provider, ProviderKind, Sources, TreeRequest};
use crate::architecture::Architecture;
use crate::error::Result;
use crate::listing::DirectoryPattern;
use crate::selector::{select, Candidate};
use crate::version::{Catalog, Category, VersionFloor, VersionKey};

const FLOOR: VersionFloor = VersionFloor::minor(7, 5);

/// First major using the `BaseOS` variant and `.0` suffixed tree names.
const BASEOS_FROM: u32 = 8;

pub struct Rhel;

fn variant(major: u32) -> &'static str {
    if major < BASEOS_FROM {
        "Server"
    } else {
        "BaseOS"
    }
}

impl Rhel {
    /// Latest or nightly composes: `latest-RHEL-M.m[.z]/compose` per major.
    fn scrape_composes(channel: &str, sources: &mut Sources) -> Result<Catalog> {
        let host = sources.hosts.rhel.clone();
        let majors = DirectoryPattern::prefixed("rhel")?;
        let composes = DirectoryPattern::versioned("latest-RHEL-", None)?;

        let markup = sources.listing(&host, "/")?;
        let mut catalog = Catalog::new();
        for major in majors.directories(&markup) {
            if !FLOOR.admits(&major.components) {
                continue;
            }
            let path = format!("/{}/{}/{}", major.name, channel, major.name.to_uppercase());
            let markup = sources.listing(&host, &path)?;
            let candidates: Vec<Candidate> = composes
                .directories(&markup)
                .into_iter()
                .map(|dir| {
                    let uri = sources.uri(&host, &format!("{}/{}/compose", path, dir.name));
                    Candidate::new(dir.components, uri)
                })
                .collect();
            catalog.extend(select(&candidates, &FLOOR, 2));
        }
        Ok(catalog)
    }

    /// Released trees: `RHEL-M/M.m[.z]`, or `released-RHEL-M/RHEL-M/M.m[.z]`.
    fn scrape_released(sources: &mut Sources) -> Result<Catalog> {
        let host = sources.hosts.rhel.clone();
        let markup = sources.listing(&host, "/released")?;

        let mut releases: Vec<(u32, String)> = Vec::new();
        for dir in DirectoryPattern::prefixed("RHEL")?.directories(&markup) {
            if let Some(&major) = dir.components.first() {
                releases.push((major, format!("/released/{}", dir.name)));
            }
        }
        for dir in DirectoryPattern::released_marker("RHEL")?.directories(&markup) {
            if let Some(&major) = dir.components.first() {
                releases.push((major, format!("/released/{}/RHEL-{}", dir.name, major)));
            }
        }

        let mut catalog = Catalog::new();
        for (major, path) in releases {
            if !FLOOR.admits(&[major]) {
                continue;
            }
            let markup = sources.listing(&host, &path)?;
            let candidates: Vec<Candidate> = DirectoryPattern::versioned("", Some(major))?
                .directories(&markup)
                .into_iter()
                .map(|dir| {
                    let uri = sources.uri(&host, &format!("{}/{}", path, dir.name));
                    Candidate::new(dir.components, uri)
                })
                .collect();
            for (key, uri) in select(&candidates, &FLOOR, 2) {
                catalog.entry(key).or_insert(uri);
            }
        }
        Ok(catalog)
    }
}

impl Provider for Rhel {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Rhel
    }

    fn floor(&self) -> VersionFloor {
        FLOOR
    }

    fn find_agnostic(
        &self,
        category: Category,
        _arch: &Architecture,
        sources: &mut Sources,
    ) -> Result<Catalog> {
        match category {
            Category::Released => {
                let walked = walk_minors(&mut sources.trees, FLOOR, |major, minor| TreeRequest {
                    family: format!("RedHatEnterpriseLinux{}", major),
                    name: format!(
                        "RHEL-{}.{}{}",
                        major,
                        minor,
                        if major < BASEOS_FROM { "" } else { ".0" }
                    ),
                    variant: variant(major),
                })?;
                match walked {
                    Some(catalog) => Ok(catalog),
                    None => Self::scrape_released(sources),
                }
            }
            Category::Latest => Self::scrape_composes("rel-eng", sources),
            Category::Nightly => Self::scrape_composes("nightly", sources),
        }
    }

    fn architecture_indicator(
        &self,
        key: &VersionKey,
        root: &str,
        arch: &Architecture,
    ) -> ArchitectureIndicator {
        ArchitectureIndicator::Anchor {
            uri: format!("{}/{}", root, variant(key.major_component())),
            anchor: format!("{}/", arch.name()),
        }
    }
}
