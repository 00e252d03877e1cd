//! Fedora: single-level version keys (`"30"`).
//!
//! Released trees live under `releases/`, the in-progress branch under
//! `development/`. There is no separate nightly channel. Secondary
//! architectures are published from a different mirror tree, and releases
//! past end of life move to the archive host, signalled by a `README` in the
//! release directory.

use url::Url;

use super::{walk_majors, ArchitectureIndicator, Provider, ProviderKind, Sources, TreeRequest};
use crate::architecture::Architecture;
use crate::error::Result;
use crate::listing::{self, DirectoryPattern};
use crate::selector::{select, Candidate};
use crate::version::{Catalog, Category, VersionFloor, VersionKey};

const FLOOR: VersionFloor = VersionFloor::major(28);

/// First release whose structured metadata uses the `Everything` variant.
const EVERYTHING_FROM: u32 = 31;

pub struct Fedora;

impl Fedora {
    fn category_path(category: Category, arch: &Architecture) -> String {
        let start = if arch.is_secondary() {
            "/pub/fedora-secondary"
        } else {
            "/pub/fedora/linux"
        };
        match category {
            Category::Released => format!("{}/releases", start),
            Category::Latest | Category::Nightly => format!("{}/development", start),
        }
    }

    fn scrape(path: &str, sources: &mut Sources) -> Result<Catalog> {
        let host = sources.hosts.fedora.clone();
        let markup = sources.listing(&host, path)?;
        let candidates: Vec<Candidate> = DirectoryPattern::numeric()?
            .directories(&markup)
            .into_iter()
            .map(|dir| {
                let uri = sources.uri(&host, &format!("{}/{}", path, dir.name));
                Candidate::new(dir.components, uri)
            })
            .collect();

        select(&candidates, &FLOOR, 1)
            .into_iter()
            .map(|(key, uri)| -> Result<(VersionKey, String)> {
                Ok((key, Self::unarchived(uri, sources)?))
            })
            .collect()
    }

    /// The archive location of `uri` when the release has been archived.
    fn unarchived(uri: String, sources: &mut Sources) -> Result<String> {
        let markup = sources.fetcher.fetch(&uri)?;
        if !listing::has_entry(&markup, "README") {
            return Ok(uri);
        }
        let mut url = Url::parse(&uri)?;
        url.set_host(Some(&sources.hosts.fedora_archive))?;
        let path = url.path().replacen("/pub/", "/pub/archive/", 1);
        url.set_path(&path);
        Ok(url.to_string())
    }
}

impl Provider for Fedora {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Fedora
    }

    fn floor(&self) -> VersionFloor {
        FLOOR
    }

    fn alias(&self, category: Category) -> Category {
        match category {
            Category::Nightly => Category::Latest,
            other => other,
        }
    }

    fn record_key(&self, category: Category, arch: &Architecture) -> String {
        if arch.is_secondary() {
            format!("{}-secondary", category)
        } else {
            category.to_string()
        }
    }

    fn find_agnostic(
        &self,
        category: Category,
        arch: &Architecture,
        sources: &mut Sources,
    ) -> Result<Catalog> {
        if self.supports_structured_metadata(category) {
            let walked = walk_majors(&mut sources.trees, FLOOR, |major| TreeRequest {
                family: format!("Fedora{}", major),
                name: format!("Fedora-{}", major),
                variant: if major < EVERYTHING_FROM {
                    "Server"
                } else {
                    "Everything"
                },
            })?;
            if let Some(catalog) = walked {
                return Ok(catalog);
            }
        }
        Self::scrape(&Self::category_path(category, arch), sources)
    }

    fn architecture_indicator(
        &self,
        _key: &VersionKey,
        root: &str,
        arch: &Architecture,
    ) -> ArchitectureIndicator {
        ArchitectureIndicator::NonEmpty {
            uri: format!("{}/Everything/{}", root, arch.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{anchors, sources, FakeTrees, PageTransport};
    use super::*;

    const RELEASES: &str = "http://dl.fedoraproject.org/pub/fedora/linux/releases/";

    fn x86_64() -> Architecture {
        Architecture::new("x86_64", false)
    }

    #[test]
    fn test_scrape_selects_and_archives() {
        let transport = PageTransport::default()
            .page(RELEASES, &anchors(&["27/", "28/", "30/", "33/", "test/"]))
            .page(&format!("{}28/", RELEASES), &anchors(&["README", "Everything/"]))
            .page(&format!("{}30/", RELEASES), &anchors(&["Everything/"]));
        let mut sources = sources(transport, FakeTrees::missing());

        let catalog = Fedora
            .find_agnostic(Category::Released, &x86_64(), &mut sources)
            .unwrap();

        let keys: Vec<String> = catalog.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["28", "30", "33"]);
        assert_eq!(
            catalog[&VersionKey::major(28)],
            "http://archives.fedoraproject.org/pub/archive/fedora/linux/releases/28"
        );
        assert_eq!(
            catalog[&VersionKey::major(30)],
            "http://dl.fedoraproject.org/pub/fedora/linux/releases/30"
        );
    }

    #[test]
    fn test_structured_metadata_preferred_for_released() {
        let trees = FakeTrees::default()
            .tree("Fedora-28", "Server", "http://bos/F-28/Server/x86_64/os")
            .tree("Fedora-31", "Everything", "http://bos/F-31/Everything/x86_64/os");
        let transport = PageTransport::default();
        let requests = transport.requests.clone();
        let mut sources = sources(transport, trees);

        let catalog = Fedora
            .find_agnostic(Category::Released, &x86_64(), &mut sources)
            .unwrap();

        // Fedora-29 has no tree, so the walk ends before 31.
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[&VersionKey::major(28)], "http://bos/F-28");
        assert!(requests.borrow().is_empty());
    }

    #[test]
    fn test_latest_scrapes_development_even_with_metadata() {
        let dev = "http://dl.fedoraproject.org/pub/fedora/linux/development/";
        let transport = PageTransport::default().page(dev, &anchors(&["34/", "rawhide/"]));
        let trees = FakeTrees::default().tree("Fedora-28", "Server", "http://bos/F-28/Server/x86_64/os");
        let queried = trees.queried.clone();
        let mut sources = sources(transport, trees);

        let catalog = Fedora
            .find_agnostic(Category::Latest, &x86_64(), &mut sources)
            .unwrap();

        assert_eq!(
            catalog[&VersionKey::major(34)],
            "http://dl.fedoraproject.org/pub/fedora/linux/development/34"
        );
        assert!(queried.borrow().is_empty());
    }

    #[test]
    fn test_secondary_architecture_path_and_record() {
        let s390x = Architecture::new("s390x", true);
        assert_eq!(
            Fedora::category_path(Category::Released, &s390x),
            "/pub/fedora-secondary/releases"
        );
        assert_eq!(Fedora.record_key(Category::Released, &s390x), "released-secondary");
        assert_eq!(Fedora.record_key(Category::Latest, &x86_64()), "latest");
    }

    #[test]
    fn test_nightly_aliases_latest() {
        assert_eq!(Fedora.alias(Category::Nightly), Category::Latest);
        assert_eq!(Fedora.alias(Category::Released), Category::Released);
    }

    #[test]
    fn test_architecture_indicator() {
        let root = "http://dl.fedoraproject.org/pub/fedora/linux/releases/30";
        let everything = format!("{}/Everything/x86_64/", root);
        let transport = PageTransport::default().page(&everything, &anchors(&["os/"]));
        let mut sources = sources(transport, FakeTrees::missing());
        let key = VersionKey::major(30);

        assert!(Fedora
            .has_architecture(&key, root, &x86_64(), &mut sources)
            .unwrap());
        assert!(!Fedora
            .has_architecture(&key, root, &Architecture::new("aarch64", false), &mut sources)
            .unwrap());
    }
}
