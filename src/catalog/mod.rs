//! Session-level catalog state: page loading, facet options and the
//! search orchestrator that ties them to the index.

pub mod facets;
pub mod orchestrator;
pub mod pages;

pub use facets::FacetOptions;
pub use orchestrator::{LoadState, RankedResult, SearchOrchestrator, SearchStatus};
pub use pages::{ClubSource, FetchOutcome, FetchTicket, JsonPageSource};
