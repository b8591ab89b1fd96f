//! Facet filtering over a club collection.
//!
//! Each facet is an OR over its selected values; active facets combine with
//! AND. Stages always run in [`FilterStage::ORDER`] and each one produces a
//! new candidate list, leaving its input untouched.

use crate::index::build::SearchIndex;
use crate::index::types::{Club, ClubId};
use crate::query::parser::ParsedQuery;
use crate::utils::{normalize_key, query_words};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;

/// Currently active facet choices and free text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub schools: BTreeSet<String>,
    /// Category and affiliation tags share this one selection
    pub categories: BTreeSet<String>,
    pub follow_only: bool,
    pub query: String,
}

impl FilterSelection {
    /// Selection with the given schools pre-selected
    pub fn with_schools<I, S>(schools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schools: schools.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add or remove a school. Returns true if it is now selected.
    pub fn toggle_school(&mut self, school: &str) -> bool {
        toggle(&mut self.schools, school)
    }

    /// Add or remove a category or affiliation. Returns true if it is now selected.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        toggle(&mut self.categories, category)
    }

    /// Fold a parsed query in: its free text replaces the query, its
    /// inline filters are added to the facets
    pub fn merge_parsed(&mut self, parsed: ParsedQuery) {
        self.query = parsed.text;
        self.schools.extend(parsed.schools);
        self.categories.extend(parsed.categories);
        self.follow_only |= parsed.follow_only;
    }

    pub fn query_words(&self) -> Vec<String> {
        query_words(&self.query)
    }

    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}

/// Filter stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    School,
    Category,
    Follow,
    FreeText,
}

impl FilterStage {
    pub const ORDER: [FilterStage; 4] = [
        FilterStage::School,
        FilterStage::Category,
        FilterStage::Follow,
        FilterStage::FreeText,
    ];
}

/// One run of the facet filters against one selection
pub struct FacetFilterPipeline<'a> {
    selection: &'a FilterSelection,
    followed: &'a FxHashSet<ClubId>,
    /// Normalized canonical names matching the free text; `None` for a blank query
    text_matches: Option<FxHashSet<String>>,
}

impl<'a> FacetFilterPipeline<'a> {
    /// Resolve the selection's free text against `index` and prepare the stages
    pub fn new(
        selection: &'a FilterSelection,
        followed: &'a FxHashSet<ClubId>,
        index: &SearchIndex,
    ) -> Self {
        let text_matches = selection.has_query().then(|| {
            let words = selection.query_words();
            index.names_matching(words.as_slice())
        });
        Self::with_text_matches(selection, followed, text_matches)
    }

    /// Prepare the stages with free-text matches resolved by the caller
    pub fn with_text_matches(
        selection: &'a FilterSelection,
        followed: &'a FxHashSet<ClubId>,
        text_matches: Option<FxHashSet<String>>,
    ) -> Self {
        Self {
            selection,
            followed,
            text_matches,
        }
    }

    /// Run every stage in order
    pub fn run<'c>(&self, clubs: &'c [Club]) -> Vec<&'c Club> {
        let mut candidates: Vec<&'c Club> = clubs.iter().collect();
        for stage in FilterStage::ORDER {
            candidates = self.apply_stage(stage, &candidates);
        }
        candidates
    }

    /// Run a single stage over a candidate list
    pub fn apply_stage<'c>(&self, stage: FilterStage, candidates: &[&'c Club]) -> Vec<&'c Club> {
        candidates
            .iter()
            .copied()
            .filter(|club| self.keeps(stage, club))
            .collect()
    }

    fn keeps(&self, stage: FilterStage, club: &Club) -> bool {
        match stage {
            FilterStage::School => {
                let schools = &self.selection.schools;
                schools.is_empty() || club.schools.iter().any(|s| schools.contains(s))
            }
            FilterStage::Category => {
                let selected = &self.selection.categories;
                selected.is_empty()
                    || club
                        .categories
                        .iter()
                        .chain(club.affiliations.iter())
                        .any(|tag| selected.contains(tag))
            }
            FilterStage::Follow => !self.selection.follow_only || self.followed.contains(&club.id),
            FilterStage::FreeText => match &self.text_matches {
                None => true,
                Some(names) => names.contains(&normalize_key(&club.name)),
            },
        }
    }
}
