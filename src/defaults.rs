//! Default values for repo-roots configuration.
//!
//! This module provides centralized default locations used by the library
//! and the command layer, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

fn config_base() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".repo-roots"))
        .join("repo-roots")
}

/// Returns the default directory for on-disk catalog records.
///
/// Uses the platform-appropriate configuration directory:
/// - Linux: `~/.config/repo-roots/repos` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/repo-roots/repos`
/// - Windows: `{FOLDERID_RoamingAppData}\repo-roots\repos`
///
/// Falls back to `.repo-roots/repo-roots/repos` in the current directory if
/// the platform directory cannot be determined.
///
/// This can be overridden by the `cache-root` configuration key, the
/// `--cache-root` CLI flag or the `REPO_ROOTS_CACHE` environment variable.
pub fn default_cache_root() -> PathBuf {
    config_base().join("repos")
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    config_base().join("config.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_root_returns_path() {
        let cache_root = default_cache_root();
        assert!(cache_root.ends_with("repo-roots/repos"));
    }

    #[test]
    fn test_default_config_path_shares_base() {
        let config = default_config_path();
        assert!(config.ends_with("repo-roots/config.yaml"));
        assert_eq!(config.parent(), default_cache_root().parent());
    }
}
