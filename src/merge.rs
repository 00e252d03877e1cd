//! # Root Merge
//!
//! Callers rarely want a single channel. Each `View` overlays all three
//! category catalogs, lowest precedence first, so that on a version key
//! present in several channels the view's own channel wins while keys only
//! found elsewhere still show up.
//!
//! | view     | overlay order (last wins)   |
//! |----------|-----------------------------|
//! | released | nightly, latest, released   |
//! | latest   | nightly, released, latest   |
//! | nightly  | released, latest, nightly   |

use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::version::{Catalog, Category};

/// Which channel wins when merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Released,
    Latest,
    Nightly,
}

impl View {
    pub const ALL: [View; 3] = [View::Released, View::Latest, View::Nightly];

    /// Categories in overlay order; the last one wins collisions.
    pub fn precedence(&self) -> [Category; 3] {
        match self {
            View::Released => [Category::Nightly, Category::Latest, Category::Released],
            View::Latest => [Category::Nightly, Category::Released, Category::Latest],
            View::Nightly => [Category::Released, Category::Latest, Category::Nightly],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Released => "released",
            View::Latest => "latest",
            View::Nightly => "nightly",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|view| view.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown view: {}", s))
    }
}

/// Overlay the catalogs `catalog_for` returns, in `view`'s precedence order.
///
/// Catalogs are requested lowest precedence first.
pub fn merge_view<F>(view: View, mut catalog_for: F) -> Result<Catalog>
where
    F: FnMut(Category) -> Result<Catalog>,
{
    let mut merged = Catalog::new();
    for category in view.precedence() {
        merged.extend(catalog_for(category)?);
    }
    Ok(merged)
}
