//! Result ranking: most followed first, then alphabetical.
//!
//! Names compare with base sensitivity (case and accents ignored). Remaining
//! ties fall back to the raw name and then the club id, which makes the order
//! total: the same set of clubs always ranks the same way, whatever order it
//! arrived in.

use crate::index::types::Club;
use crate::utils::collation_key;
use std::cmp::Reverse;

/// Sort key for one club
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankKey {
    followers: Reverse<u64>,
    collated: String,
    name: String,
    id: String,
}

impl RankKey {
    pub fn of(club: &Club) -> Self {
        Self {
            followers: Reverse(club.followers),
            collated: collation_key(&club.name),
            name: club.name.clone(),
            id: club.id.clone(),
        }
    }
}

/// Sort filtered clubs into rank order
pub fn rank<'c>(mut clubs: Vec<&'c Club>) -> Vec<&'c Club> {
    clubs.sort_by_cached_key(|club| RankKey::of(club));
    clubs
}
