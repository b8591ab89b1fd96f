//! # clubfind - Club Search and Filter Engine
//!
//! clubfind keeps a paginated collection of student clubs searchable as
//! pages arrive. Names and aliases go into a word-prefix trie, facet
//! filters narrow the collection, and results are ranked by popularity.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Prefix trie, alias map and the combined search index
//! - [`query`] - Query parsing, facet filtering and ranking
//! - [`catalog`] - Page loading, facet options and the search orchestrator
//! - [`output`] - Terminal and JSON result formatting
//! - [`error`] - Index and fetch error types
//! - [`utils`] - Normalization, collation, config and progress helpers
//!
//! ## Quick Start
//!
//! ```
//! use clubfind::catalog::SearchOrchestrator;
//! use clubfind::index::Club;
//!
//! let mut orchestrator = SearchOrchestrator::new();
//! let ticket = orchestrator.begin_fetch(1);
//! orchestrator.complete_fetch(
//!     ticket,
//!     Ok(vec![
//!         Club::new("1", "Chess Club").with_aliases(["CC"]).with_followers(10),
//!         Club::new("2", "Computer Club").with_followers(50),
//!     ]),
//! );
//!
//! orchestrator.set_query("c club");
//! let names: Vec<_> = orchestrator.results().iter().map(|c| c.name.clone()).collect();
//! assert_eq!(names, ["Computer Club", "Chess Club"]);
//! ```
//!
//! ## Matching
//!
//! Every whitespace-separated word of a name or alias is indexed from the
//! trie root, so "club" finds "Chess Club". A multi-word query matches a
//! key only if each query word prefixes some word of that key.

pub mod catalog;
pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod utils;

pub use catalog::{FetchOutcome, SearchOrchestrator, SearchStatus};
pub use error::{FetchError, IndexError};
pub use index::{Club, SearchIndex};
pub use query::{parse_query, FilterSelection};
