//! # Repo Roots Library
//!
//! Discovers the root URIs of package repository trees for Fedora, RHEL and
//! CentOS, organized by version and release channel, and filtered by CPU
//! architecture. It backs the `repo-roots` command-line tool but is usable on
//! its own by test harnesses that need "every supported release of X".
//!
//! ## Quick Example
//!
//! Selecting the newest tree per `major.minor` from a handful of scraped
//! directory names:
//!
//! ```
//! use repo_roots::selector::{select, Candidate};
//! use repo_roots::version::{VersionFloor, VersionKey};
//!
//! let candidates = vec![
//!     Candidate::new(vec![7, 4], "http://host/7.4"),
//!     Candidate::new(vec![7, 9], "http://host/7.9"),
//!     Candidate::new(vec![8, 4, 0], "http://host/8.4.0"),
//!     Candidate::new(vec![8, 4, 1], "http://host/8.4.1"),
//! ];
//! let catalog = select(&candidates, &VersionFloor::minor(7, 5), 2);
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog[&VersionKey::minor(8, 4)], "http://host/8.4.1");
//! ```
//!
//! ## Core Concepts
//!
//! - **Categories (`version`)**: every family publishes *released*,
//!   *latest* and *nightly* trees. A **catalog** maps version keys such as
//!   `"30"` or `"8.4"` to root URIs.
//! - **Providers (`provider`)**: one strategy per family decides where its
//!   trees live, how directory names map to version keys, and how to tell
//!   whether a root carries an architecture.
//! - **Sources (`transport`, `listing`, `metadata`)**: HTML directory
//!   listings fetched over HTTP with retries, and the `bkr` inventory tool
//!   when it is installed.
//! - **Caching (`cache`)**: computed catalogs are stored on disk as JSON
//!   with a TTL, and architecture-specific records are invalidated when the
//!   agnostic record they were filtered from is rewritten.
//! - **Views (`merge`)**: released, latest and nightly views overlay the
//!   three categories with different precedence.
//!
//! ## Execution Flow
//!
//! `repository::RootsRepository` is the entry point. For a view and an
//! architecture it:
//!
//! 1.  **Resolves** the architecture (default `x86_64`).
//! 2.  **Loads or computes** the agnostic catalog of each category through
//!     the provider.
//! 3.  **Filters** it down to roots that carry the architecture, cached as
//!     a dependent record.
//! 4.  **Merges** the three filtered catalogs by the view's precedence.

pub mod architecture;
pub mod cache;
pub mod config;
pub mod defaults;
pub mod error;
pub mod listing;
pub mod merge;
pub mod metadata;
pub mod output;
pub mod provider;
pub mod repository;
pub mod selector;
pub mod suggestions;
pub mod transport;
pub mod version;

#[cfg(test)]
mod selector_proptest;
