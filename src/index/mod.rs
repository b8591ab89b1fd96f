pub mod alias;
pub mod build;
pub mod stats;
pub mod trie;
pub mod types;

pub use alias::AliasMap;
pub use build::SearchIndex;
pub use stats::IndexStats;
pub use trie::PrefixIndex;
pub use types::*;
