//! Index key to canonical club name resolution.
//!
//! The relation is many-to-many: a club is reachable through its name and
//! every alias, and one alias ("ACM", "SWE") may be claimed by several clubs.

use crate::utils::normalize_key;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Maps each normalized key to the canonical names it refers to
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    entries: FxHashMap<String, Vec<String>>,
    /// Keys in first-registration order
    order: Vec<String>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point an already normalized key at `canonical`.
    ///
    /// Recurring keys accumulate names; registering the same pair twice is a no-op.
    /// Keys come from [`PrefixIndex`](crate::index::trie::PrefixIndex) as stored there.
    pub(crate) fn register(&mut self, key: String, canonical: &str) {
        match self.entries.get_mut(&key) {
            Some(names) => {
                if !names.iter().any(|n| n == canonical) {
                    names.push(canonical.to_string());
                }
            }
            None => {
                self.order.push(key.clone());
                self.entries.insert(key, vec![canonical.to_string()]);
            }
        }
    }

    /// Canonical names for the given keys, case-normalized and deduplicated.
    ///
    /// Keys without an entry resolve to nothing. That only happens when a key
    /// list from an older index is resolved against a newer map.
    pub fn resolve<'k>(&self, keys: impl IntoIterator<Item = &'k str>) -> FxHashSet<String> {
        let mut names = FxHashSet::default();
        for key in keys {
            let Some(canonical) = self.names_for(key) else {
                debug!(target: "clubfind::index", key = key, "Inconsistent index state: key has no alias entry");
                continue;
            };
            names.extend(
                canonical
                    .iter()
                    .map(|n| normalize_key(n))
                    .filter(|n| !n.is_empty()),
            );
        }
        names
    }

    /// Canonical names registered for a key (raw or normalized)
    pub fn names_for(&self, key: &str) -> Option<&[String]> {
        match self.entries.get(key) {
            Some(names) => Some(names.as_slice()),
            None => self.entries.get(&normalize_key(key)).map(Vec::as_slice),
        }
    }

    /// Keys claimed by more than one club name
    pub fn ambiguous_keys(&self) -> Vec<(&str, &[String])> {
        self.order
            .iter()
            .filter_map(|k| {
                let names = &self.entries[k];
                (names.len() > 1).then_some((k.as_str(), names.as_slice()))
            })
            .collect()
    }

    /// All keys in first-registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
