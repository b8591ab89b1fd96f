//! Owns the club collection, its index, the filter selection and the
//! published result list.
//!
//! Every mutating call runs to completion before returning: a page that
//! changes the collection rebuilds the index and recomputes results in the
//! same call, so callers only ever see a consistent snapshot.

use crate::catalog::facets::FacetOptions;
use crate::catalog::pages::{ClubSource, FetchOutcome, FetchTicket};
use crate::error::FetchError;
use crate::index::build::SearchIndex;
use crate::index::types::{Club, ClubId};
use crate::query::filter::{FacetFilterPipeline, FilterSelection};
use crate::query::ranker::rank;
use crate::utils::AppConfig;
use lru::LruCache;
use roaring::RoaringBitmap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Ranked clubs, shared read-only with consumers
pub type RankedResult = Arc<[Club]>;

/// Load lifecycle of the held collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing loaded yet
    Empty,
    /// At least one fetch is outstanding
    Loading,
    /// Results reflect the latest applied page
    Ready,
}

/// Loading/error signal published next to the results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStatus {
    pub state: LoadState,
    /// Most recent fetch failure, cleared by the next successful page
    pub last_error: Option<FetchError>,
    /// False once a page came back empty
    pub has_more: bool,
}

/// Search and filter state for one browsing session
pub struct SearchOrchestrator {
    clubs: Vec<Club>,
    positions: FxHashMap<ClubId, usize>,
    index: Arc<SearchIndex>,
    facets: FacetOptions,
    selection: FilterSelection,
    followed: FxHashSet<ClubId>,
    results: RankedResult,

    /// State once no fetch is outstanding
    settled: LoadState,
    in_flight: FxHashSet<u64>,
    next_seq: u64,
    /// Responses older than this were issued before the latest reset
    reset_floor: u64,
    /// Page 1 request still outstanding
    pending_reset: Option<u64>,
    /// Later pages that landed while `pending_reset` was outstanding, by sequence
    deferred: BTreeMap<u64, (FetchTicket, Vec<Club>)>,
    latest_applied: Option<u64>,
    last_page: u32,
    has_more: bool,
    last_error: Option<FetchError>,

    /// Single-word trie lookups for the current index generation
    prefix_cache: Option<LruCache<String, Option<RoaringBitmap>>>,
}

impl Default for SearchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOrchestrator {
    pub fn new() -> Self {
        Self {
            clubs: Vec::new(),
            positions: FxHashMap::default(),
            index: Arc::new(SearchIndex::default()),
            facets: FacetOptions::default(),
            selection: FilterSelection::default(),
            followed: FxHashSet::default(),
            results: Arc::from(Vec::new()),
            settled: LoadState::Empty,
            in_flight: FxHashSet::default(),
            next_seq: 0,
            reset_floor: 0,
            pending_reset: None,
            deferred: BTreeMap::new(),
            latest_applied: None,
            last_page: 0,
            has_more: true,
            last_error: None,
            prefix_cache: None,
        }
    }

    /// Orchestrator with the config's default schools and cache size
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_selection(FilterSelection::with_schools(config.default_schools.iter().cloned()))
            .with_prefix_cache(config.prefix_cache_size)
    }

    pub fn with_selection(mut self, selection: FilterSelection) -> Self {
        self.selection = selection;
        self.recompute();
        self
    }

    /// Cache up to `capacity` single-word lookups per index generation (0 disables)
    pub fn with_prefix_cache(mut self, capacity: usize) -> Self {
        self.prefix_cache = NonZeroUsize::new(capacity).map(LruCache::new);
        self
    }

    // Fetch lifecycle

    /// Register an outgoing page request
    pub fn begin_fetch(&mut self, page: u32) -> FetchTicket {
        let ticket = FetchTicket {
            seq: self.next_seq,
            page: page.max(1),
        };
        self.next_seq += 1;

        if ticket.is_reset() {
            self.reset_floor = ticket.seq;
            self.pending_reset = Some(ticket.seq);
            self.deferred.clear();
        }
        self.in_flight.insert(ticket.seq);
        debug!(target: "clubfind::catalog", seq = ticket.seq, page = ticket.page, "Fetch issued");
        ticket
    }

    /// Apply (or discard) the response to an earlier [`begin_fetch`](Self::begin_fetch).
    ///
    /// While a page 1 request is outstanding, later pages that land first are
    /// held back and applied right after it, never onto the old collection.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        response: Result<Vec<Club>, FetchError>,
    ) -> FetchOutcome {
        self.in_flight.remove(&ticket.seq);

        if self.is_superseded(ticket) {
            debug!(
                target: "clubfind::catalog",
                seq = ticket.seq,
                page = ticket.page,
                "Dropping superseded page"
            );
            return FetchOutcome::Superseded { page: ticket.page };
        }

        let page = match response {
            Ok(page) => page,
            Err(e) => {
                warn!(target: "clubfind::catalog", page = ticket.page, error = %e, "Page fetch failed");
                if self.pending_reset == Some(ticket.seq) {
                    self.abandon_reset();
                }
                self.last_error = Some(e.clone());
                return FetchOutcome::Failed(e);
            }
        };

        if self.pending_reset.is_some_and(|reset| ticket.seq > reset) {
            debug!(
                target: "clubfind::catalog",
                seq = ticket.seq,
                page = ticket.page,
                "Holding page until reset lands"
            );
            self.deferred.insert(ticket.seq, (ticket, page));
            return FetchOutcome::Deferred { page: ticket.page };
        }

        if self.pending_reset == Some(ticket.seq) {
            self.pending_reset = None;
        }

        let outcome = self.apply_page(ticket, page);
        let mut changed = ticket.is_reset() || matches!(outcome, FetchOutcome::Applied { .. });

        for (held, clubs) in std::mem::take(&mut self.deferred).into_values() {
            let held_outcome = self.apply_page(held, clubs);
            changed |= matches!(held_outcome, FetchOutcome::Applied { .. });
        }

        if changed {
            self.rebuild();
        }

        match outcome {
            FetchOutcome::Applied { page, added, .. } => FetchOutcome::Applied {
                page,
                added,
                total: self.clubs.len(),
            },
            other => other,
        }
    }

    fn is_superseded(&self, ticket: FetchTicket) -> bool {
        ticket.seq < self.reset_floor || self.latest_applied.is_some_and(|latest| ticket.seq < latest)
    }

    /// Merge one accepted page into the collection without rebuilding
    fn apply_page(&mut self, ticket: FetchTicket, page: Vec<Club>) -> FetchOutcome {
        self.latest_applied = Some(ticket.seq);
        self.last_error = None;
        self.settled = LoadState::Ready;

        if ticket.is_reset() {
            self.clubs.clear();
            self.positions.clear();
            self.last_page = 0;
            self.has_more = true;
        }

        if page.is_empty() {
            self.has_more = false;
            return FetchOutcome::EndOfPages { page: ticket.page };
        }

        let added = self.merge_page(page);
        self.last_page = ticket.page;
        FetchOutcome::Applied {
            page: ticket.page,
            added,
            total: self.clubs.len(),
        }
    }

    /// The outstanding page 1 request failed: every request issued so far
    /// continues a listing that never loaded
    fn abandon_reset(&mut self) {
        self.pending_reset = None;
        self.reset_floor = self.next_seq;
        if !self.deferred.is_empty() {
            debug!(
                target: "clubfind::catalog",
                held = self.deferred.len(),
                "Discarding pages held for a failed reset"
            );
            self.deferred.clear();
        }
    }

    /// Fetch a page synchronously from `source`
    pub fn fetch_page<S: ClubSource + ?Sized>(&mut self, source: &mut S, page: u32) -> FetchOutcome {
        let ticket = self.begin_fetch(page);
        let response = source.fetch_page(ticket.page);
        self.complete_fetch(ticket, response)
    }

    /// Fetch the page after the last one applied, if any remain
    pub fn load_more<S: ClubSource + ?Sized>(&mut self, source: &mut S) -> Option<FetchOutcome> {
        let page = self.next_page()?;
        Some(self.fetch_page(source, page))
    }

    /// Page to request next, or `None` once the source reported the end
    pub fn next_page(&self) -> Option<u32> {
        self.has_more.then_some(self.last_page + 1)
    }

    /// Add a page to the collection, deduplicating on club id.
    /// Returns the number of clubs not held before.
    fn merge_page(&mut self, page: Vec<Club>) -> usize {
        let mut added = 0;
        for club in page {
            match self.positions.get(&club.id) {
                Some(&pos) => self.clubs[pos] = club,
                None => {
                    self.positions.insert(club.id.clone(), self.clubs.len());
                    self.clubs.push(club);
                    added += 1;
                }
            }
        }
        added
    }

    /// Replace the index wholesale, then recompute results
    fn rebuild(&mut self) {
        let generation = self.index.generation() + 1;
        let index = SearchIndex::build(&self.clubs, generation);
        self.index = Arc::new(index);
        self.facets = FacetOptions::from_clubs(&self.clubs);
        if let Some(cache) = self.prefix_cache.as_mut() {
            cache.clear();
        }
        self.recompute();
    }

    // Selection setters

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.selection.query = query.into();
        self.recompute();
    }

    pub fn set_schools<I, S>(&mut self, schools: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection.schools = schools.into_iter().map(Into::into).collect();
        self.recompute();
    }

    pub fn toggle_school(&mut self, school: &str) -> bool {
        let selected = self.selection.toggle_school(school);
        self.recompute();
        selected
    }

    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection.categories = categories.into_iter().map(Into::into).collect();
        self.recompute();
    }

    pub fn toggle_category(&mut self, category: &str) -> bool {
        let selected = self.selection.toggle_category(category);
        self.recompute();
        selected
    }

    pub fn set_follow_only(&mut self, follow_only: bool) {
        self.selection.follow_only = follow_only;
        self.recompute();
    }

    /// Replace the set of club ids the current user follows
    pub fn set_followed<I>(&mut self, followed: I)
    where
        I: IntoIterator<Item = ClubId>,
    {
        self.followed = followed.into_iter().collect();
        self.recompute();
    }

    /// Replace the whole selection at once
    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
        self.recompute();
    }

    /// Clear every facet and the query
    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::default();
        self.recompute();
    }

    // Recompute

    /// Run the full filter pipeline for the current selection and publish the ranking
    pub fn recompute(&mut self) {
        let text_matches = if self.selection.has_query() {
            let words = self.selection.query_words();
            Some(self.cached_text_matches(&words))
        } else {
            None
        };

        let pipeline = FacetFilterPipeline::with_text_matches(&self.selection, &self.followed, text_matches);
        let ranked: Vec<Club> = rank(pipeline.run(&self.clubs)).into_iter().cloned().collect();

        debug!(
            target: "clubfind::catalog",
            generation = self.index.generation(),
            held = self.clubs.len(),
            shown = ranked.len(),
            "Recomputed results"
        );
        self.results = Arc::from(ranked);
    }

    /// Rank the current collection under an arbitrary selection without
    /// touching orchestrator state
    pub fn apply_filters(&self, selection: &FilterSelection) -> RankedResult {
        let pipeline = FacetFilterPipeline::new(selection, &self.followed, &self.index);
        let ranked: Vec<Club> = rank(pipeline.run(&self.clubs)).into_iter().cloned().collect();
        Arc::from(ranked)
    }

    fn cached_text_matches(&mut self, words: &[String]) -> FxHashSet<String> {
        let index = Arc::clone(&self.index);
        let Some(cache) = self.prefix_cache.as_mut() else {
            return index.names_matching(words);
        };

        let mut postings = Vec::with_capacity(words.len());
        for word in words {
            let hit = match cache.get(word) {
                Some(postings) => postings.clone(),
                None => {
                    let looked_up = index.prefix().prefix_postings(word).cloned();
                    cache.put(word.clone(), looked_up.clone());
                    looked_up
                }
            };
            match hit {
                Some(keys) => postings.push(keys),
                None => return FxHashSet::default(),
            }
        }
        index.names_matching_postings(postings.as_slice())
    }

    // Accessors

    /// Current ranked results. Cheap to clone; never modified after publication.
    pub fn results(&self) -> RankedResult {
        Arc::clone(&self.results)
    }

    pub fn status(&self) -> SearchStatus {
        let state = if self.in_flight.is_empty() {
            self.settled
        } else {
            LoadState::Loading
        };
        SearchStatus {
            state,
            last_error: self.last_error.clone(),
            has_more: self.has_more,
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn facets(&self) -> &FacetOptions {
        &self.facets
    }

    /// Current index snapshot
    pub fn index(&self) -> Arc<SearchIndex> {
        Arc::clone(&self.index)
    }

    /// Every held club, in first-seen order
    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn last_page(&self) -> u32 {
        self.last_page
    }
}
