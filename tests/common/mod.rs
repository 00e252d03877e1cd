//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let server = ListingServer::default().listing("http://host/released/", &["RHEL-8/"]);
//! let mut repo = repository(ProviderKind::Rhel, temp.path(), &server, Inventory::missing());
//! ```

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use repo_roots::architecture::KnownArchitectures;
use repo_roots::config::Config;
use repo_roots::error::Result;
use repo_roots::metadata::{DistroTree, DistroTreeQuery, TreeLookup};
use repo_roots::provider::ProviderKind;
use repo_roots::repository::RootsRepository;
use repo_roots::transport::{HttpResponse, Transport, TransportFailure};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{
        age_record, anchors, repository, write_record, Inventory, ListingServer, TestFixture,
    };
}

/// Internal build host used by RHEL and CentOS.
pub const ENG: &str = "http://download.eng.bos.redhat.com";

/// Public Fedora mirror.
pub const FEDORA: &str = "http://dl.fedoraproject.org";

/// Listing markup with one anchor per name.
pub fn anchors(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("<a href=\"{0}\">{0}</a>\n", name))
        .collect()
}

/// Fake web server answering from a mutable page table.
///
/// Clones share the table and request log, so a test can keep one handle,
/// give another to a repository, and change pages between queries.
#[derive(Clone, Default)]
pub struct ListingServer {
    pages: Rc<RefCell<HashMap<String, String>>>,
    unresolvable: Rc<RefCell<Vec<String>>>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl ListingServer {
    pub fn page(self, uri: &str, body: &str) -> Self {
        self.set_page(uri, body);
        self
    }

    pub fn listing(self, uri: &str, names: &[&str]) -> Self {
        self.page(uri, &anchors(names))
    }

    /// Replace (or add) a page after the server has been handed out.
    pub fn set_page(&self, uri: &str, body: &str) {
        self.pages
            .borrow_mut()
            .insert(uri.to_string(), body.to_string());
    }

    /// Every request to a URI starting with `prefix` fails name resolution.
    pub fn unresolvable(self, prefix: &str) -> Self {
        self.unresolvable.borrow_mut().push(prefix.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self, uri: &str) -> usize {
        self.requests.borrow().iter().filter(|r| *r == uri).count()
    }

    pub fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }
}

impl Transport for ListingServer {
    fn get(&self, uri: &str, _timeout: Duration) -> std::result::Result<HttpResponse, TransportFailure> {
        self.requests.borrow_mut().push(uri.to_string());
        if self
            .unresolvable
            .borrow()
            .iter()
            .any(|prefix| uri.starts_with(prefix.as_str()))
        {
            return Err(TransportFailure::Dns(format!("failed to lookup {}", uri)));
        }
        Ok(match self.pages.borrow().get(uri) {
            Some(body) => HttpResponse::ok(body.clone()),
            None => HttpResponse {
                status: 404,
                body: String::new(),
            },
        })
    }
}

/// Fake inventory tool keyed by exact tree name.
#[derive(Clone, Default)]
pub struct Inventory {
    trees: HashMap<String, Vec<DistroTree>>,
    missing: bool,
    queried: Rc<RefCell<Vec<String>>>,
}

impl Inventory {
    /// The tool is not installed.
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Default::default()
        }
    }

    /// Register a tree available from the Boston lab at `os_uri`.
    pub fn tree(mut self, name: &str, variant: &str, os_uri: &str) -> Self {
        self.trees.entry(name.to_string()).or_default().push(DistroTree {
            variant: variant.to_string(),
            arch: "x86_64".to_string(),
            available: vec![("lab-01.bos.redhat.com".to_string(), os_uri.to_string())],
        });
        self
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.borrow().clone()
    }
}

impl DistroTreeQuery for Inventory {
    fn tool(&self) -> &str {
        "fake-bkr"
    }

    fn query(&self, _family: &str, name: Option<&str>) -> Result<TreeLookup> {
        let name = name.unwrap_or_default();
        self.queried.borrow_mut().push(name.to_string());
        if self.missing {
            return Ok(TreeLookup::ToolMissing);
        }
        Ok(match self.trees.get(name) {
            Some(trees) => TreeLookup::Trees(trees.clone()),
            None => TreeLookup::NoDistroTree,
        })
    }
}

/// Config rooted at `cache_root`, otherwise defaults.
pub fn config(cache_root: &Path) -> Config {
    Config {
        cache_root: cache_root.to_path_buf(),
        ..Config::default()
    }
}

/// A repository wired to the fakes.
pub fn repository(
    kind: ProviderKind,
    cache_root: &Path,
    server: &ListingServer,
    inventory: Inventory,
) -> RootsRepository {
    repository_with(kind, &config(cache_root), server, inventory)
}

pub fn repository_with(
    kind: ProviderKind,
    config: &Config,
    server: &ListingServer,
    inventory: Inventory,
) -> RootsRepository {
    RootsRepository::with_collaborators(
        kind.strategy(),
        Box::new(server.clone()),
        Box::new(inventory),
        Box::new(KnownArchitectures::new()),
        config,
    )
}

/// Write `<root>/<provider>/<name>.json` with `entries` as its catalog.
pub fn write_record(root: &Path, provider: &str, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let dir = root.join(provider);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}.json", name));
    let catalog: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(key, uri)| (key.to_string(), serde_json::Value::String(uri.to_string())))
        .collect();
    fs::write(&path, serde_json::to_string(&catalog).unwrap()).unwrap();
    path
}

/// Backdate a record's modification time by `age`.
pub fn age_record(path: &Path, age: Duration) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

/// Temporary directory with a cache root and a config file for CLI runs.
pub struct TestFixture {
    pub temp: assert_fs::TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp: assert_fs::TempDir::new().unwrap(),
        }
    }

    pub fn cache_root(&self) -> PathBuf {
        self.temp.path().join("repos")
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp.path().join("config.yaml")
    }

    /// Write a config file; without one the CLI uses defaults.
    pub fn with_config(self, yaml: &str) -> Self {
        fs::write(self.config_path(), yaml).unwrap();
        self
    }

    /// Pre-populate fresh agnostic and `x86_64` records for every category
    /// name in `records`, so that no network access is needed.
    pub fn with_records(self, provider: &str, records: &[(&str, &[(&str, &str)])]) -> Self {
        let root = self.cache_root();
        for (name, entries) in records {
            write_record(&root, provider, name, entries);
        }
        for (name, entries) in records {
            write_record(&root, provider, &format!("{}-x86_64", name), entries);
        }
        self
    }

    /// A command with `--config` and `--cache-root` pointing into the fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("repo-roots");
        cmd.env_remove("REPO_ROOTS_CONFIG")
            .env_remove("REPO_ROOTS_CACHE")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path())
            .arg("--cache-root")
            .arg(self.cache_root());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
