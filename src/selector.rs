//! # Version Selector
//!
//! Reduces a flat list of versioned candidates to a catalog holding one
//! entry per version at the requested depth (per major for Fedora, per minor
//! for RHEL and CentOS), each pointing at its newest finer release.
//!
//! Each level is walked in ascending numeric order over the values actually
//! present. Gaps are skipped silently, so a listing of `28`, `30` and `33`
//! yields keys `28`, `30` and `33` without complaint, and a stray huge
//! directory name costs one extra key rather than a walk over the range.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::version::{Catalog, VersionFloor, VersionKey};

/// A versioned location found in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Numeric components, most significant first (`[8, 4, 1]`).
    pub components: Vec<u32>,
    pub uri: String,
}

impl Candidate {
    pub fn new(components: Vec<u32>, uri: impl Into<String>) -> Self {
        Self {
            components,
            uri: uri.into(),
        }
    }
}

/// Select one candidate per version key of length `depth`.
///
/// Candidates below `floor` are discarded first. Among candidates sharing a
/// key, the one with the numerically largest finer components wins (absent
/// components count as `0`); ties go to the earliest candidate.
pub fn select(candidates: &[Candidate], floor: &VersionFloor, depth: usize) -> Catalog {
    let admitted: Vec<&Candidate> = candidates
        .iter()
        .filter(|candidate| floor.admits(&candidate.components))
        .collect();

    let mut catalog = Catalog::new();
    if depth > 0 {
        select_level(&admitted, 0, depth, &mut Vec::new(), &mut catalog);
    }
    catalog
}

fn select_level(
    candidates: &[&Candidate],
    level: usize,
    depth: usize,
    prefix: &mut Vec<u32>,
    catalog: &mut Catalog,
) {
    let values: BTreeSet<u32> = candidates
        .iter()
        .filter_map(|candidate| candidate.components.get(level).copied())
        .collect();

    for value in values {
        let matching: Vec<&Candidate> = candidates
            .iter()
            .copied()
            .filter(|candidate| candidate.components.get(level) == Some(&value))
            .collect();

        prefix.push(value);
        if level + 1 == depth {
            if let Some(winner) = newest(&matching, depth) {
                catalog.insert(VersionKey::new(prefix.clone()), winner.uri.clone());
            }
        } else {
            select_level(&matching, level + 1, depth, prefix, catalog);
        }
        prefix.pop();
    }
}

/// The candidate with the largest components from `from` onwards.
fn newest<'a>(candidates: &[&'a Candidate], from: usize) -> Option<&'a Candidate> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|a, b| compare_finer(&b.components, &a.components, from));
    sorted.first().copied()
}

fn compare_finer(a: &[u32], b: &[u32], from: usize) -> Ordering {
    let len = a.len().max(b.len());
    (from..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
