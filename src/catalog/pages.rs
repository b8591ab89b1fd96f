//! Club page sources and fetch bookkeeping.
//!
//! A [`ClubSource`] answers one page at a time; an empty page means there are
//! no more. Every request the orchestrator hands out carries a [`FetchTicket`]
//! whose sequence number decides, on arrival, whether the response is still
//! current.

use crate::error::FetchError;
use crate::index::types::Club;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// External collaborator that fetches club pages (1-based)
pub trait ClubSource {
    fn fetch_page(&mut self, page: u32) -> Result<Vec<Club>, FetchError>;
}

impl<F> ClubSource for F
where
    F: FnMut(u32) -> Result<Vec<Club>, FetchError>,
{
    fn fetch_page(&mut self, page: u32) -> Result<Vec<Club>, FetchError> {
        self(page)
    }
}

/// Handle for one in-flight page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    /// Monotonic request number, assigned when the request is issued
    pub seq: u64,
    pub page: u32,
}

impl FetchTicket {
    /// Page 1 replaces the whole collection instead of extending it
    pub fn is_reset(&self) -> bool {
        self.page == 1
    }
}

/// What happened to a completed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page merged and the index rebuilt
    Applied {
        page: u32,
        /// Clubs not previously held
        added: usize,
        /// Collection size after the merge
        total: usize,
    },
    /// Page was empty: no more pages after this one
    EndOfPages { page: u32 },
    /// A newer request already landed; this response was dropped
    Superseded { page: u32 },
    /// Held until the outstanding page 1 request lands, then applied on top of it
    Deferred { page: u32 },
    /// The source failed; previous results are kept
    Failed(FetchError),
}

/// Reads `page-<n>.json` files from a directory, or a single JSON file as page 1.
///
/// Each file holds a JSON array of clubs. A missing page file is an empty
/// page.
#[derive(Debug, Clone)]
pub struct JsonPageSource {
    root: PathBuf,
}

impl JsonPageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file backing `page`, or `None` when a single file has no such page
    pub fn page_path(&self, page: u32) -> Option<PathBuf> {
        if self.root.is_file() {
            return (page == 1).then(|| self.root.clone());
        }
        Some(self.root.join(format!("page-{page}.json")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ClubSource for JsonPageSource {
    fn fetch_page(&mut self, page: u32) -> Result<Vec<Club>, FetchError> {
        let Some(path) = self.page_path(page) else {
            return Ok(Vec::new());
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(FetchError::Unavailable {
                    page,
                    message: format!("{}: {}", path.display(), e),
                });
            }
        };

        serde_json::from_str(&content).map_err(|e| FetchError::Malformed {
            page,
            message: format!("{}: {}", path.display(), e),
        })
    }
}
