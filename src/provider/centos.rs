//! CentOS: released trees only; latest and nightly are the released set.

use super::{walk_minors, ArchitectureIndicator, Provider, ProviderKind, Sources, TreeRequest};
use crate::architecture::Architecture;
use crate::error::Result;
use crate::listing::DirectoryPattern;
use crate::selector::{select, Candidate};
use crate::version::{Catalog, Category, VersionFloor, VersionKey};

const FLOOR: VersionFloor = VersionFloor::minor(8, 3);

const VARIANT: &str = "BaseOS";

pub struct CentOs;

impl CentOs {
    fn scrape_released(sources: &mut Sources) -> Result<Catalog> {
        let host = sources.hosts.centos.clone();
        let start = "/released/CentOS";
        let markup = sources.listing(&host, start)?;

        let mut catalog = Catalog::new();
        for release in DirectoryPattern::prefixed("centos")?.directories(&markup) {
            let Some(&major) = release.components.first() else {
                continue;
            };
            if !FLOOR.admits(&[major]) {
                continue;
            }
            let path = format!("{}/centos-{}", start, major);
            let markup = sources.listing(&host, &path)?;
            let candidates: Vec<Candidate> = DirectoryPattern::versioned("", Some(major))?
                .directories(&markup)
                .into_iter()
                .map(|dir| {
                    let uri = sources.uri(&host, &format!("{}/{}", path, dir.name));
                    Candidate::new(dir.components, uri)
                })
                .collect();
            catalog.extend(select(&candidates, &FLOOR, 2));
        }
        Ok(catalog)
    }
}

impl Provider for CentOs {
    fn kind(&self) -> ProviderKind {
        ProviderKind::CentOs
    }

    fn floor(&self) -> VersionFloor {
        FLOOR
    }

    fn alias(&self, _category: Category) -> Category {
        Category::Released
    }

    fn find_agnostic(
        &self,
        category: Category,
        _arch: &Architecture,
        sources: &mut Sources,
    ) -> Result<Catalog> {
        if self.supports_structured_metadata(category) {
            let walked = walk_minors(&mut sources.trees, FLOOR, |major, minor| TreeRequest {
                family: format!("CentOSLinux{}", major),
                name: format!("CentOS-{}.{}", major, minor),
                variant: VARIANT,
            })?;
            if let Some(catalog) = walked {
                return Ok(catalog);
            }
        }
        Self::scrape_released(sources)
    }

    fn architecture_indicator(
        &self,
        _key: &VersionKey,
        root: &str,
        arch: &Architecture,
    ) -> ArchitectureIndicator {
        ArchitectureIndicator::Anchor {
            uri: format!("{}/{}", root, VARIANT),
            anchor: format!("{}/", arch.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{anchors, sources, FakeTrees, PageTransport};
    use super::*;

    const HOST: &str = "http://download.eng.bos.redhat.com";

    #[test]
    fn test_every_category_aliases_released() {
        for category in Category::ALL {
            assert_eq!(CentOs.alias(category), Category::Released);
        }
    }

    #[test]
    fn test_released_scrape() {
        let transport = PageTransport::default()
            .page(
                &format!("{}/released/CentOS/", HOST),
                &anchors(&["centos-7/", "centos-8/", "centos-stream/"]),
            )
            .page(
                &format!("{}/released/CentOS/centos-8/", HOST),
                &anchors(&["8.2.2004/", "8.3.2011/", "8.5.2111/", "8.5.2111.1/"]),
            );
        let mut sources = sources(transport, FakeTrees::missing());

        let catalog = CentOs
            .find_agnostic(Category::Released, &Architecture::new("x86_64", false), &mut sources)
            .unwrap();

        let keys: Vec<String> = catalog.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["8.3", "8.5"]);
        assert_eq!(
            catalog[&VersionKey::minor(8, 5)],
            format!("{}/released/CentOS/centos-8/8.5.2111", HOST)
        );
    }

    #[test]
    fn test_released_from_structured_metadata() {
        let trees = FakeTrees::default()
            .tree("CentOS-8.3", "BaseOS", "http://bos/CentOS-8.3/compose/BaseOS/x86_64/os")
            .tree("CentOS-8.4", "BaseOS", "http://bos/CentOS-8.4/compose/BaseOS/x86_64/os");
        let queried = trees.queried.clone();
        let mut sources = sources(PageTransport::default(), trees);

        let catalog = CentOs
            .find_agnostic(Category::Released, &Architecture::new("x86_64", false), &mut sources)
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[&VersionKey::minor(8, 4)], "http://bos/CentOS-8.4/compose");
        assert_eq!(
            *queried.borrow(),
            vec!["CentOS-8.3", "CentOS-8.4", "CentOS-8.5", "CentOS-9.0"]
        );
    }

    #[test]
    fn test_architecture_indicator() {
        assert_eq!(
            CentOs.architecture_indicator(
                &VersionKey::minor(8, 5),
                "http://h/8.5",
                &Architecture::new("aarch64", false)
            ),
            ArchitectureIndicator::Anchor {
                uri: "http://h/8.5/BaseOS".to_string(),
                anchor: "aarch64/".to_string(),
            }
        );
    }
}
