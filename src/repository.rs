//! # Roots Repository
//!
//! `RootsRepository` is the public entry point: one instance per
//! distribution family, owning every cache involved in answering a query.
//!
//! ## Layers
//!
//! A query for `(category, architecture)` goes through, in order:
//!
//! 1. the in-memory architecture-specific catalog,
//! 2. the on-disk architecture-specific record, which depends on
//! 3. the in-memory architecture-agnostic catalog,
//! 4. the on-disk agnostic record, and finally
//! 5. the provider strategy, which reads listings through the in-memory
//!    `UriFetcher` and the inventory tool.
//!
//! Categories a family does not publish separately are aliased by the
//! strategy before any lookup, so an alias never creates its own records.
//!
//! ## Design
//!
//! The network transport, inventory tool and architecture knowledge are
//! injected as trait objects, the same way the rest of the crate separates
//! policy from I/O. `new` wires in the real implementations;
//! `with_collaborators` accepts fakes for tests.
//!
//! Every method takes `&mut self`: the caches are plain owned state with no
//! internal locking, so sharing an instance across threads needs an outer
//! `Mutex`.

use std::collections::HashMap;
use std::time::SystemTime;

use log::debug;

use crate::architecture::{Architecture, Architectures, KnownArchitectures};
use crate::cache::CatalogStore;
use crate::config::Config;
use crate::error::Result;
use crate::merge::{merge_view, View};
use crate::metadata::{BeakerCommand, DistroTreeQuery};
use crate::provider::{Provider, ProviderKind, Sources};
use crate::transport::{Transport, UreqTransport};
use crate::version::{Catalog, Category};

/// Discovery engine for one distribution family.
pub struct RootsRepository {
    provider: Box<dyn Provider>,
    sources: Sources,
    store: CatalogStore,
    architectures: Box<dyn Architectures>,
    agnostic: HashMap<String, (Catalog, SystemTime)>,
    specific: HashMap<(Category, String), Catalog>,
}

impl RootsRepository {
    /// Create a repository using the network, `bkr` and the known
    /// architectures.
    pub fn new(kind: ProviderKind, config: &Config) -> Result<Self> {
        let architectures = match &config.default_architecture {
            Some(name) => KnownArchitectures::with_default(name)?,
            None => KnownArchitectures::new(),
        };
        Ok(Self::with_collaborators(
            kind.strategy(),
            Box::new(UreqTransport::new()),
            Box::new(BeakerCommand::new(config.metadata_command.clone())),
            Box::new(architectures),
            config,
        ))
    }

    /// Create a repository with custom collaborators (useful for testing).
    pub fn with_collaborators(
        provider: Box<dyn Provider>,
        transport: Box<dyn Transport>,
        query: Box<dyn DistroTreeQuery>,
        architectures: Box<dyn Architectures>,
        config: &Config,
    ) -> Self {
        Self {
            provider,
            sources: Sources::new(transport, query, config),
            store: CatalogStore::new(config.cache_root.clone(), config.ttl(), config.rescan),
            architectures,
            agnostic: HashMap::new(),
            specific: HashMap::new(),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn default_architecture(&self) -> &str {
        self.architectures.default_architecture()
    }

    /// Released view: released roots win over latest, latest over nightly.
    pub fn available_roots(&mut self, architecture: Option<&str>) -> Result<Catalog> {
        self.view(View::Released, architecture)
    }

    /// Latest view: latest roots win over released, released over nightly.
    pub fn available_latest_roots(&mut self, architecture: Option<&str>) -> Result<Catalog> {
        self.view(View::Latest, architecture)
    }

    /// Nightly view: nightly roots win over latest, latest over released.
    pub fn available_nightly_roots(&mut self, architecture: Option<&str>) -> Result<Catalog> {
        self.view(View::Nightly, architecture)
    }

    /// The merged catalog for `view`.
    ///
    /// Without an `architecture` the default architecture is used.
    pub fn view(&mut self, view: View, architecture: Option<&str>) -> Result<Catalog> {
        let arch = self.architectures.resolve(architecture)?;
        merge_view(view, |category| self.specific_catalog(category, &arch))
    }

    /// The architecture-specific catalog of a single category.
    pub fn catalog(&mut self, category: Category, architecture: Option<&str>) -> Result<Catalog> {
        let arch = self.architectures.resolve(architecture)?;
        self.specific_catalog(category, &arch)
    }

    /// Drop every in-memory catalog and fetched listing.
    ///
    /// On-disk records are untouched; the next query reads them again.
    pub fn clear_memory(&mut self) {
        self.agnostic.clear();
        self.specific.clear();
        self.sources.fetcher.clear();
    }

    fn specific_catalog(&mut self, category: Category, arch: &Architecture) -> Result<Catalog> {
        let category = self.provider.alias(category);
        let memo_key = (category, arch.name().to_string());
        if let Some(catalog) = self.specific.get(&memo_key) {
            return Ok(catalog.clone());
        }

        let (agnostic, written) = self.agnostic_catalog(category, arch)?;
        let record = format!("{}-{}", self.provider.record_key(category, arch), arch);
        let provider = &self.provider;
        let sources = &mut self.sources;
        let (catalog, _) =
            self.store
                .load_or_compute(provider.kind().name(), &record, Some(written), || {
                    let mut kept = Catalog::new();
                    for (key, root) in agnostic {
                        if provider.has_architecture(&key, &root, arch, sources)? {
                            kept.insert(key, root);
                        } else {
                            debug!("{} {} lacks {}", provider.kind(), key, arch);
                        }
                    }
                    Ok(kept)
                })?;

        self.specific.insert(memo_key, catalog.clone());
        Ok(catalog)
    }

    fn agnostic_catalog(
        &mut self,
        category: Category,
        arch: &Architecture,
    ) -> Result<(Catalog, SystemTime)> {
        let record = self.provider.record_key(category, arch);
        if let Some(found) = self.agnostic.get(&record) {
            return Ok(found.clone());
        }

        let provider = &self.provider;
        let sources = &mut self.sources;
        let found = self
            .store
            .load_or_compute(provider.kind().name(), &record, None, || {
                provider.find_agnostic(category, arch, sources)
            })?;

        self.agnostic.insert(record, found.clone());
        Ok(found)
    }
}
