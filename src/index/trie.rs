//! Prefix trie over club names and aliases.
//!
//! Every whitespace-delimited sub-word of a key is inserted from the root, so
//! "women" reaches "society of women engineers" just as "society" does. Each
//! node carries a bitmap of the keys that have a sub-word passing through it;
//! answering a prefix query is one descent plus bitmap membership tests over
//! the caller's candidates.

use crate::error::IndexError;
use crate::index::types::{KeyId, NodeId};
use crate::utils::{normalize_key, query_words, sub_words};
use ahash::AHashMap;
use roaring::RoaringBitmap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::borrow::Borrow;

const ROOT: NodeId = 0;

#[derive(Debug, Default, Clone)]
struct TrieNode {
    children: AHashMap<char, NodeId>,
    /// Keys with a sub-word that has this node's path as a prefix
    keys: RoaringBitmap,
}

/// Character trie keyed by normalized index keys
#[derive(Debug, Clone)]
pub struct PrefixIndex {
    nodes: Vec<TrieNode>,
    keys: Vec<String>,
    key_ids: FxHashMap<String, KeyId>,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            keys: Vec::new(),
            key_ids: FxHashMap::default(),
        }
    }

    /// Insert a key, registering each of its sub-words as an entry point.
    ///
    /// Returns the key's ordinal. Inserting a key that is already present
    /// (after normalization) returns the existing ordinal and changes nothing.
    pub fn insert(&mut self, raw: &str) -> Result<KeyId, IndexError> {
        let key = normalize_key(raw);
        if key.is_empty() {
            return Err(IndexError::InvalidKey {
                raw: raw.to_string(),
            });
        }

        if let Some(&id) = self.key_ids.get(&key) {
            return Ok(id);
        }

        let id = self.keys.len() as KeyId;
        for word in sub_words(&key) {
            let mut node = ROOT;
            for ch in word.chars() {
                node = self.child_or_insert(node, ch);
                self.nodes[node as usize].keys.insert(id);
            }
        }

        self.key_ids.insert(key.clone(), id);
        self.keys.push(key);
        Ok(id)
    }

    fn child_or_insert(&mut self, parent: NodeId, ch: char) -> NodeId {
        if let Some(&child) = self.nodes[parent as usize].children.get(&ch) {
            return child;
        }
        let child = self.nodes.len() as NodeId;
        self.nodes.push(TrieNode::default());
        self.nodes[parent as usize].children.insert(ch, child);
        child
    }

    /// Keys having a sub-word that starts with `word`.
    ///
    /// `word` must already be normalized and contain no whitespace.
    /// Returns `None` when no sub-word has that prefix.
    pub fn prefix_postings(&self, word: &str) -> Option<&RoaringBitmap> {
        if word.is_empty() {
            return None;
        }
        let mut node = ROOT;
        for ch in word.chars() {
            node = *self.nodes[node as usize].children.get(&ch)?;
        }
        Some(&self.nodes[node as usize].keys)
    }

    /// Candidates whose every query word matches a sub-word prefix.
    ///
    /// Query words are normalized; empty ones are skipped. With no usable
    /// query words every candidate is returned. Keys held by the index but
    /// absent from `candidate_keys` never appear in the result.
    pub fn words_matching_all_prefixes<'c, S, I>(
        &self,
        query: &[S],
        candidate_keys: I,
    ) -> FxHashSet<&'c str>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = &'c str>,
    {
        let words: Vec<String> = query
            .iter()
            .flat_map(|w| query_words(w.as_ref()))
            .collect();

        let mut postings = Vec::with_capacity(words.len());
        for word in &words {
            match self.prefix_postings(word) {
                Some(keys) => postings.push(keys),
                // One unmatched word empties the AND
                None => return FxHashSet::default(),
            }
        }

        self.retain_matching(&postings, candidate_keys)
    }

    /// Keep the candidates present in every postings bitmap.
    ///
    /// An empty `postings` slice keeps every candidate.
    pub fn retain_matching<'c, B, I>(&self, postings: &[B], candidate_keys: I) -> FxHashSet<&'c str>
    where
        B: Borrow<RoaringBitmap>,
        I: IntoIterator<Item = &'c str>,
    {
        let mut ordered: Vec<&RoaringBitmap> = postings
            .iter()
            .map(|p| Borrow::<RoaringBitmap>::borrow(p))
            .collect();
        // Smallest first so most candidates fail on the first probe
        ordered.sort_by_key(|p| p.len());

        candidate_keys
            .into_iter()
            .filter(|candidate| {
                if ordered.is_empty() {
                    return true;
                }
                match self.key_id(candidate) {
                    Some(id) => ordered.iter().all(|p| p.contains(id)),
                    None => false,
                }
            })
            .collect()
    }

    /// Ordinal of a key, accepting raw or normalized input
    pub fn key_id(&self, key: &str) -> Option<KeyId> {
        match self.key_ids.get(key) {
            Some(&id) => Some(id),
            None => self.key_ids.get(&normalize_key(key)).copied(),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.key_id(key).is_some()
    }

    /// Key text for an ordinal
    pub fn key(&self, id: KeyId) -> Option<&str> {
        self.keys.get(id as usize).map(String::as_str)
    }

    /// All inserted keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of trie nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
