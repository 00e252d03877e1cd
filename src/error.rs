//! # Error Handling
//!
//! This module defines the centralized error type for `repo-roots`. It uses
//! `thiserror` to build a single `Error` enum covering every failure a
//! discovery query can surface, and a `Result<T>` alias used throughout the
//! library.
//!
//! Not every unusual condition is an error. A non-200 HTTP status is "empty
//! content", a structured metadata query that reports no distro tree ends an
//! enumeration, and a missing metadata tool switches a repository to web
//! scraping. Those are modelled as values (see `transport` and `metadata`).
//! What remains here is:
//!
//! - Transport failures that exhausted their retries (`HostUnreachable`,
//!   `Timeout`) or could not be retried at all (`Network`).
//! - A metadata tool that exited with an unexpected status (`MetadataTool`).
//! - Configuration and cache problems.
//! - Wrapped library errors (I/O, JSON, YAML, regex, URL parsing).

use thiserror::Error;

/// Main error type for repo-roots operations
#[derive(Error, Debug)]
pub enum Error {
    /// The host of a URI could not be resolved, even after retrying.
    #[error("Host unreachable for {uri}: {message}")]
    HostUnreachable { uri: String, message: String },

    /// Every attempt to fetch a URI timed out.
    #[error("Timed out fetching {uri}: {message}")]
    Timeout { uri: String, message: String },

    /// A transport failure that is not retried (refused connection, TLS,
    /// truncated body and similar).
    #[error("Network operation error: {uri} - {message}")]
    Network { uri: String, message: String },

    /// The structured metadata tool ran but failed in an unexpected way.
    #[error("Metadata tool error: {tool} - {message}")]
    MetadataTool { tool: String, message: String },

    /// An error occurred while parsing the configuration file.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An error occurred with an on-disk cache record.
    #[error("Cache operation error: {message}")]
    Cache { message: String },

    /// No provider is registered under the requested name.
    #[error("Unknown provider: {name}")]
    UnknownProvider { name: String },

    /// The requested architecture is not one of the known choices.
    #[error("Unknown architecture: {name}")]
    UnknownArchitecture { name: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Whether the error came from the network layer after retries ran out.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::HostUnreachable { .. } | Error::Timeout { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
