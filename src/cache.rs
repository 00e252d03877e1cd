//! # Persistent Catalog Cache
//!
//! Catalogs are expensive to compute (dozens of listing fetches, or one
//! inventory query per release) and change slowly, so every computed catalog
//! is written to disk as JSON:
//!
//! ```text
//! <cache root>/<Provider>/<record>.json
//! ```
//!
//! Record names are the agnostic key (`released`, `latest-secondary`, ...)
//! and, for architecture-specific records, that key plus `-<arch>`.
//!
//! ## Freshness
//!
//! A record's modification time is its only timestamp. A record is served
//! from disk when:
//!
//! - no forced rescan was requested,
//! - it is younger than the TTL,
//! - it is not older than its dependency (the agnostic record it was derived
//!   from), when it has one,
//! - and its content parses. Unparsable content is treated like a miss.
//!
//! Otherwise it is truncated, recomputed, written, synced and read back.
//!
//! ## Concurrency
//!
//! Records are opened with exclusive creation first so that a file another
//! process is writing is never replaced by a fresh inode. Two processes may
//! still both recompute the same record and overwrite each other; the
//! results are identical, so this only costs time.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::version::Catalog;

const RECORD_EXTENSION: &str = "json";

/// An on-disk record, as reported by `CatalogStore::records`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub provider: String,
    pub name: String,
    pub path: PathBuf,
    pub modified: SystemTime,
    pub age: Duration,
    /// Entry count, `None` when the content does not parse.
    pub entries: Option<usize>,
    /// Within the TTL and parseable. Dependencies are not considered.
    pub fresh: bool,
}

/// On-disk catalog records under one cache root.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    root: PathBuf,
    ttl: Duration,
    rescan: bool,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>, ttl: Duration, rescan: bool) -> Self {
        Self {
            root: root.into(),
            ttl,
            rescan,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Path of the record `name` for `provider`.
    pub fn path(&self, provider: &str, name: &str) -> PathBuf {
        self.root
            .join(provider)
            .join(format!("{}.{}", name, RECORD_EXTENSION))
    }

    /// Return the record's catalog, recomputing it with `compute` when stale.
    ///
    /// `dependency` is the modification time of the record this one was
    /// derived from. Returns the catalog with the record's modification time.
    pub fn load_or_compute<F>(
        &self,
        provider: &str,
        name: &str,
        dependency: Option<SystemTime>,
        compute: F,
    ) -> Result<(Catalog, SystemTime)>
    where
        F: FnOnce() -> Result<Catalog>,
    {
        let path = self.path(provider, name);
        if let Some(parent) = path.parent() {
            create_record_dir(parent)?;
        }
        let mut file = open_record(&path)?;

        let metadata = file.metadata()?;
        let modified = metadata.modified()?;
        if metadata.len() > 0 && self.is_fresh(modified, dependency) {
            match read_catalog(&mut file) {
                Ok(catalog) => {
                    debug!("using cached record {}", path.display());
                    return Ok((catalog, modified));
                }
                Err(e) => warn!("unreadable record {}: {}; recomputing", path.display(), e),
            }
        }

        info!("computing {} {}", provider, name);
        file.set_len(0)?;
        let catalog = compute()?;
        file.seek(SeekFrom::Start(0))?;
        serde_json::to_writer(&mut file, &catalog)?;
        file.sync_all()?;

        let written = read_catalog(&mut file).map_err(|e| Error::Cache {
            message: format!("record {} did not read back: {}", path.display(), e),
        })?;
        let modified = file.metadata()?.modified()?;
        Ok((written, modified))
    }

    fn is_fresh(&self, modified: SystemTime, dependency: Option<SystemTime>) -> bool {
        if self.rescan {
            return false;
        }
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        age < self.ttl && dependency.is_none_or(|dependency| modified >= dependency)
    }

    /// Every record under the cache root, sorted by provider then name.
    pub fn records(&self) -> Result<Vec<Record>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let now = SystemTime::now();
        let mut records = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::Cache {
                message: format!("failed to scan {}: {}", self.root.display(), e),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION)
            {
                continue;
            }
            let (Some(provider), Some(name)) = (
                path.parent()
                    .and_then(|p| p.file_name())
                    .and_then(|n| n.to_str()),
                path.file_stem().and_then(|n| n.to_str()),
            ) else {
                continue;
            };

            let modified = entry
                .metadata()
                .map_err(|e| Error::Cache {
                    message: format!("failed to stat {}: {}", path.display(), e),
                })?
                .modified()?;
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            let entries = File::open(path)
                .ok()
                .and_then(|mut file| read_catalog(&mut file).ok())
                .map(|catalog| catalog.len());

            records.push(Record {
                provider: provider.to_string(),
                name: name.to_string(),
                path: path.to_path_buf(),
                modified,
                age,
                entries,
                fresh: entries.is_some() && age < self.ttl,
            });
        }
        // File names sort `released-x86_64.json` before `released.json`.
        records.sort_by(|a, b| (&a.provider, &a.name).cmp(&(&b.provider, &b.name)));
        Ok(records)
    }

    /// Delete one record.
    pub fn remove(&self, record: &Record) -> Result<()> {
        match fs::remove_file(&record.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn open_record(path: &Path) -> Result<File> {
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Ok(OpenOptions::new().read(true).write(true).open(path)?)
        }
        Err(e) => Err(e.into()),
    }
}

fn read_catalog(file: &mut File) -> Result<Catalog> {
    let mut content = String::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_string(&mut content)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(unix)]
fn create_record_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_record_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}
