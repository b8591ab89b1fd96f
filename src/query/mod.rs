pub mod filter;
pub mod parser;
pub mod ranker;

pub use filter::{FacetFilterPipeline, FilterSelection, FilterStage};
pub use parser::{parse_query, ParsedQuery};
pub use ranker::{rank, RankKey};
