//! # Transport Cache
//!
//! Every listing page and architecture probe goes through a `UriFetcher`,
//! which owns the raw HTTP collaborator (`Transport`) and remembers each body
//! it has fetched so that a URI is requested at most once per fetcher.
//!
//! ## Rules
//!
//! - URIs are normalized to end in `/` before they are used as cache keys.
//! - Only a `200` response carries content. Any other status is recorded as
//!   an empty body, which callers read as "nothing found here".
//! - DNS failures and timeouts are retried up to the configured number of
//!   attempts; the last failure propagates as `Error::HostUnreachable` or
//!   `Error::Timeout`. Any other transport failure propagates immediately.

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use log::debug;

use crate::error::{Error, Result};

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of attempts for retryable failures.
pub const DEFAULT_RETRIES: u32 = 3;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Why a single attempt produced no response at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// Host name resolution failed.
    Dns(String),
    /// Connecting or reading exceeded the timeout.
    Timeout(String),
    /// Anything else; not retried.
    Other(String),
}

/// Trait for raw HTTP GETs - allows faking the network in tests
pub trait Transport {
    /// Issue one GET for `uri`, giving up after `timeout`.
    fn get(&self, uri: &str, timeout: Duration) -> std::result::Result<HttpResponse, TransportFailure>;
}

/// The default `Transport`, backed by a blocking `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("repo-roots/", env!("CARGO_PKG_VERSION")))
                .build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, uri: &str, timeout: Duration) -> std::result::Result<HttpResponse, TransportFailure> {
        match self.agent.get(uri).timeout(timeout).call() {
            Ok(response) => {
                let status = response.status();
                let body = response.into_string().map_err(|err| classify_io(&err))?;
                Ok(HttpResponse { status, body })
            }
            Err(ureq::Error::Status(status, _response)) => Ok(HttpResponse {
                status,
                body: String::new(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(classify_transport(&transport)),
        }
    }
}

fn classify_transport(transport: &ureq::Transport) -> TransportFailure {
    let message = transport.to_string();
    if matches!(transport.kind(), ureq::ErrorKind::Dns) {
        return TransportFailure::Dns(message);
    }
    let timed_out = std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .is_some_and(is_timeout);
    if timed_out {
        TransportFailure::Timeout(message)
    } else {
        TransportFailure::Other(message)
    }
}

fn classify_io(err: &io::Error) -> TransportFailure {
    if is_timeout(err) {
        TransportFailure::Timeout(err.to_string())
    } else {
        TransportFailure::Other(err.to_string())
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

/// Append a trailing `/` unless one is already present.
pub fn normalize_uri(uri: &str) -> String {
    if uri.ends_with('/') {
        uri.to_string()
    } else {
        format!("{}/", uri)
    }
}

/// Deduplicating, retrying front for a `Transport`.
pub struct UriFetcher {
    transport: Box<dyn Transport>,
    contents: HashMap<String, String>,
    timeout: Duration,
    retries: u32,
}

impl UriFetcher {
    pub fn new(transport: Box<dyn Transport>, timeout: Duration, retries: u32) -> Self {
        Self {
            transport,
            contents: HashMap::new(),
            timeout,
            retries: retries.max(1),
        }
    }

    /// Return the body at `uri`, fetching it on first use.
    ///
    /// An empty string is a valid result (non-200 status) and is cached like
    /// any other body.
    pub fn fetch(&mut self, uri: &str) -> Result<String> {
        let uri = normalize_uri(uri);
        if let Some(body) = self.contents.get(&uri) {
            return Ok(body.clone());
        }
        url::Url::parse(&uri)?;

        let mut attempt = 0;
        let body = loop {
            attempt += 1;
            match self.transport.get(&uri, self.timeout) {
                Ok(response) if response.status == 200 => break response.body,
                Ok(response) => {
                    debug!("{} returned status {}; treating as empty", uri, response.status);
                    break String::new();
                }
                Err(TransportFailure::Dns(message)) if attempt >= self.retries => {
                    return Err(Error::HostUnreachable { uri, message });
                }
                Err(TransportFailure::Timeout(message)) if attempt >= self.retries => {
                    return Err(Error::Timeout { uri, message });
                }
                Err(TransportFailure::Other(message)) => {
                    return Err(Error::Network { uri, message });
                }
                Err(failure) => {
                    debug!(
                        "attempt {}/{} for {} failed: {:?}",
                        attempt, self.retries, uri, failure
                    );
                }
            }
        };

        self.contents.insert(uri, body.clone());
        Ok(body)
    }

    /// Whether `uri` has already been fetched.
    pub fn is_cached(&self, uri: &str) -> bool {
        self.contents.contains_key(&normalize_uri(uri))
    }

    /// Forget every fetched body.
    pub fn clear(&mut self) {
        self.contents.clear();
    }
}
