use crate::index::types::Club;
use crate::query::filter::FilterSelection;
use serde::Serialize;
use std::collections::BTreeSet;

/// Selectable values for each facet, collected from the held clubs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    /// Distinct school tags, sorted
    pub schools: Vec<String>,
    /// Distinct category and affiliation tags merged into one sorted list
    pub categories: Vec<String>,
}

impl FacetOptions {
    pub fn from_clubs(clubs: &[Club]) -> Self {
        let mut schools = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for club in clubs {
            schools.extend(club.schools.iter().filter(|s| !s.trim().is_empty()).cloned());
            categories.extend(
                club.categories
                    .iter()
                    .chain(club.affiliations.iter())
                    .filter(|c| !c.trim().is_empty())
                    .cloned(),
            );
        }

        Self {
            schools: schools.into_iter().collect(),
            categories: categories.into_iter().collect(),
        }
    }

    /// Schools not yet selected
    pub fn available_schools<'a>(&'a self, selection: &FilterSelection) -> Vec<&'a str> {
        self.schools
            .iter()
            .filter(|s| !selection.schools.contains(*s))
            .map(String::as_str)
            .collect()
    }

    /// Categories and affiliations not yet selected
    pub fn available_categories<'a>(&'a self, selection: &FilterSelection) -> Vec<&'a str> {
        self.categories
            .iter()
            .filter(|c| !selection.categories.contains(*c))
            .map(String::as_str)
            .collect()
    }
}
