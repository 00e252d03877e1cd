//! # Output
//!
//! Terminal presentation for the CLI: whether to color, and how a merged
//! catalog is printed.
//!
//! ## Respecting User Preferences
//!
//! Color follows the `--color=never|always|auto` flag. In `auto` mode the
//! usual environment conventions apply:
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Catalog Formats
//!
//! Catalogs are rendered as a YAML mapping by default, one
//! `"<key>": <root>` line per version, or as a JSON object.

use std::env;
use std::fmt;
use std::str::FromStr;

use console::style;
use serde::Serialize;

use crate::error::Result;
use crate::version::Catalog;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether headings should be styled.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never", or "auto".
    /// Anything unrecognised is treated as "auto".
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// How catalogs are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Yaml => f.write_str("yaml"),
            Format::Json => f.write_str("json"),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format: {}", other)),
        }
    }
}

/// The line printed above each catalog, e.g. `RHEL x86_64 latest roots:`.
pub fn heading(config: &OutputConfig, provider: &str, arch: &str, view: &str) -> String {
    let text = format!("{} {} {} roots:", provider, arch, view);
    if config.use_color {
        style(text).bold().to_string()
    } else {
        text
    }
}

/// One provider/architecture answer of a `roots` run.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub provider: String,
    pub architecture: String,
    pub view: String,
    pub roots: Catalog,
}

/// Render `catalog` alone, without a trailing newline.
///
/// An empty catalog is `{}` in both formats.
pub fn render_catalog(catalog: &Catalog, format: Format) -> Result<String> {
    let rendered = match format {
        Format::Yaml => serde_yaml::to_string(catalog)?,
        Format::Json => serde_json::to_string_pretty(catalog)?,
    };
    Ok(rendered.trim_end().to_string())
}

/// Render every section of a run.
///
/// YAML prints a heading above each catalog. JSON is a single array of
/// section objects so the whole output stays machine readable.
pub fn render_sections(
    config: &OutputConfig,
    sections: &[Section],
    format: Format,
) -> Result<String> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(sections)?),
        Format::Yaml => {
            let mut blocks = Vec::with_capacity(sections.len());
            for section in sections {
                blocks.push(format!(
                    "{}\n{}",
                    heading(config, &section.provider, &section.architecture, &section.view),
                    render_catalog(&section.roots, Format::Yaml)?
                ));
            }
            Ok(blocks.join("\n\n"))
        }
    }
}
