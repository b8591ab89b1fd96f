use crate::index::alias::AliasMap;
use crate::index::stats::IndexStats;
use crate::index::trie::PrefixIndex;
use crate::index::types::Club;
use roaring::RoaringBitmap;
use rustc_hash::FxHashSet;
use std::borrow::Borrow;
use tracing::{info, warn};

/// Prefix trie and alias map built together from one club collection.
///
/// A snapshot is never modified after [`SearchIndex::build`] returns; a new
/// collection gets a new snapshot.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    generation: u64,
    prefix: PrefixIndex,
    aliases: AliasMap,
    club_count: usize,
    skipped_keys: usize,
}

impl SearchIndex {
    /// Index every club's canonical name and aliases.
    ///
    /// Blank names or aliases are logged and skipped; the rest of the
    /// collection is still indexed.
    pub fn build(clubs: &[Club], generation: u64) -> Self {
        let mut prefix = PrefixIndex::new();
        let mut aliases = AliasMap::new();
        let mut skipped_keys = 0;

        for club in clubs {
            for raw in std::iter::once(&club.name).chain(club.aliases.iter()) {
                match prefix.insert(raw) {
                    Ok(id) => {
                        if let Some(key) = prefix.key(id) {
                            aliases.register(key.to_string(), &club.name);
                        }
                    }
                    Err(e) => {
                        skipped_keys += 1;
                        warn!(
                            target: "clubfind::index",
                            club = %club.id,
                            error = %e,
                            "Skipping unindexable key"
                        );
                    }
                }
            }
        }

        info!(
            target: "clubfind::index",
            generation = generation,
            clubs = clubs.len(),
            keys = prefix.len(),
            nodes = prefix.node_count(),
            skipped = skipped_keys,
            "Rebuilt search index"
        );

        Self {
            generation,
            prefix,
            aliases,
            club_count: clubs.len(),
            skipped_keys,
        }
    }

    /// Canonical names (case-normalized) of clubs whose name or an alias
    /// matches every query word as a sub-word prefix
    pub fn names_matching<S: AsRef<str>>(&self, query_words: &[S]) -> FxHashSet<String> {
        let keys = self
            .prefix
            .words_matching_all_prefixes(query_words, self.aliases.keys());
        self.aliases.resolve(keys)
    }

    /// Like [`names_matching`](Self::names_matching) with the per-word
    /// postings already looked up
    pub fn names_matching_postings<B: Borrow<RoaringBitmap>>(&self, postings: &[B]) -> FxHashSet<String> {
        let keys = self.prefix.retain_matching(postings, self.aliases.keys());
        self.aliases.resolve(keys)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn prefix(&self) -> &PrefixIndex {
        &self.prefix
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            generation: self.generation,
            clubs: self.club_count,
            keys: self.prefix.len(),
            trie_nodes: self.prefix.node_count(),
            ambiguous_keys: self
                .aliases
                .ambiguous_keys()
                .into_iter()
                .map(|(key, names)| (key.to_string(), names.to_vec()))
                .collect(),
            skipped_keys: self.skipped_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Club> {
        vec![
            Club::new("1", "Chess Club").with_aliases(["CC"]),
            Club::new("2", "Computer Club"),
            Club::new("3", "Society of Women Engineers").with_aliases(["SWE"]),
        ]
    }

    fn sorted(names: FxHashSet<String>) -> Vec<String> {
        let mut v: Vec<_> = names.into_iter().collect();
        v.sort();
        v
    }

    #[test]
    fn test_every_key_has_alias_entry() {
        let index = SearchIndex::build(&sample(), 1);
        for key in index.prefix().keys() {
            let names = index.aliases().names_for(key).unwrap();
            assert!(!names.is_empty());
        }
        assert_eq!(index.prefix().len(), index.aliases().len());
    }

    #[test]
    fn test_names_matching() {
        let index = SearchIndex::build(&sample(), 1);

        assert_eq!(
            sorted(index.names_matching(&["c", "club"])),
            vec!["chess club", "computer club"]
        );
        assert_eq!(sorted(index.names_matching(&["cc"])), vec!["chess club"]);
        assert_eq!(sorted(index.names_matching(&["women"])), vec!["society of women engineers"]);
        assert!(index.names_matching(&["law"]).is_empty());
    }

    #[test]
    fn test_blank_keys_skipped() {
        let clubs = vec![
            Club::new("1", "   ").with_aliases(["Ghost"]),
            Club::new("2", "Chess Club").with_aliases([""]),
        ];
        let index = SearchIndex::build(&clubs, 1);
        let stats = index.stats();

        assert_eq!(stats.skipped_keys, 2);
        assert_eq!(stats.keys, 2);
        // Alias of a club with a blank name resolves to nothing usable
        assert!(index.names_matching(&["ghost"]).is_empty());
    }

    #[test]
    fn test_stats() {
        let clubs = vec![
            Club::new("1", "Association for Computing Machinery").with_aliases(["ACM"]),
            Club::new("2", "Applied Cryptography Meetup").with_aliases(["ACM"]),
        ];
        let stats = SearchIndex::build(&clubs, 7).stats();

        assert_eq!(stats.generation, 7);
        assert_eq!(stats.clubs, 2);
        assert_eq!(stats.keys, 3);
        assert_eq!(stats.ambiguous_keys.len(), 1);
        assert_eq!(stats.ambiguous_keys[0].0, "acm");
    }

    #[test]
    fn test_postings_path_matches_direct_path() {
        let index = SearchIndex::build(&sample(), 1);
        let postings: Vec<&RoaringBitmap> = ["c", "club"]
            .iter()
            .map(|w| index.prefix().prefix_postings(w).unwrap())
            .collect();

        assert_eq!(
            index.names_matching_postings(&postings),
            index.names_matching(&["c", "club"])
        );
    }
}
