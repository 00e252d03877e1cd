//! # Error Suggestions
//!
//! Helpers that turn failures into messages telling the user what went
//! wrong and what to try next. Each hint sits on its own `hint:` line.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use repo_roots::suggestions;
//!
//! let catalog = repository
//!     .view(view, Some(arch))
//!     .map_err(|error| suggestions::explain(error, &config_path))?;
//! ```

use std::path::Path;

use crate::architecture::{Architectures, KnownArchitectures};
use crate::error::Error;
use crate::provider::ProviderKind;

/// Error for `cache clean` called without selecting what to remove.
pub fn cache_clean_no_filter() -> anyhow::Error {
    anyhow::anyhow!(
        "At least one filter must be specified for cache clean\n\n\
         hint: Use --all to remove every cached record\n\
         hint: Use --stale to remove records older than the configured TTL\n\
         hint: Add --dry-run to preview what would be removed"
    )
}

/// Error for a provider name that is not supported.
pub fn unknown_provider(name: &str) -> anyhow::Error {
    let valid: Vec<&str> = ProviderKind::ALL.iter().map(|kind| kind.name()).collect();
    let did_you_mean = find_similar(name, &valid)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown provider: {name}{did_you_mean}\n\n\
         Valid providers are: {providers}",
        providers = valid.join(", ")
    )
}

/// Error for an architecture no provider builds for.
pub fn unknown_architecture(name: &str) -> anyhow::Error {
    let choices = KnownArchitectures::new().choices();
    let valid: Vec<&str> = choices.iter().map(String::as_str).collect();
    let did_you_mean = find_similar(name, &valid)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown architecture: {name}{did_you_mean}\n\n\
         Valid architectures are: {archs}\n\
         hint: Set default-architecture in the config file to change the default",
        archs = valid.join(", ")
    )
}

/// Error for a config file that failed to parse.
pub fn config_invalid(path: &Path, message: &str, hint: Option<&str>) -> anyhow::Error {
    let specific = hint
        .map(|h| format!("hint: {h}\n"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Invalid configuration file: {path}\n\
         error: {message}\n\n\
         {specific}\
         hint: Use --config to point at a different file\n\
         hint: Set REPO_ROOTS_CONFIG environment variable",
        path = path.display()
    )
}

/// Error for a host that could not be reached.
pub fn host_unreachable(uri: &str, message: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Cannot reach {uri}: {message}\n\n\
         hint: Internal hosts are only resolvable from the corporate network or VPN\n\
         hint: Override the host under 'hosts:' in the config file"
    )
}

/// Error for a host that kept timing out after every retry.
pub fn host_timeout(uri: &str, message: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Timed out fetching {uri}: {message}\n\n\
         hint: Raise timeout-secs or retries in the config file"
    )
}

/// Error for the inventory tool failing in an unexpected way.
pub fn metadata_tool_failed(tool: &str, message: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Inventory tool '{tool}' failed: {message}\n\n\
         hint: Check that '{tool}' is authenticated (e.g. a valid Kerberos ticket)\n\
         hint: Set metadata-command in the config file to use a different binary"
    )
}

/// Attach hints to a library error where one is known.
pub fn explain(error: Error, config_path: &Path) -> anyhow::Error {
    match error {
        Error::HostUnreachable { uri, message } => host_unreachable(&uri, &message),
        Error::Timeout { uri, message } => host_timeout(&uri, &message),
        Error::MetadataTool { tool, message } => metadata_tool_failed(&tool, &message),
        Error::ConfigParse { message, hint } => {
            config_invalid(config_path, &message, hint.as_deref())
        }
        Error::UnknownProvider { name } => unknown_provider(&name),
        Error::UnknownArchitecture { name } => unknown_architecture(&name),
        other => anyhow::Error::new(other),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Comparison ignores ASCII case. Returns the closest candidate within an
/// edit distance of 2.
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input = input.to_ascii_lowercase();
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(&input, &candidate.to_ascii_lowercase());
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, left) in a.iter().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, right) in b.iter().enumerate() {
            let cost = usize::from(left != right);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }
    previous[b.len()]
}
