//! Utility functions shared across the engine.
//!
//! ## Modules
//!
//! - [`app_data`] - Application config file management
//! - [`collation`] - Case- and accent-insensitive name ordering
//! - [`progress`] - Page loading spinner (no-op without the `progress` feature)
//! - [`tokenizer`] - Key normalization and query word extraction
//!
//! ## Key Functions
//!
//! ```
//! use clubfind::utils::{normalize_key, query_words};
//!
//! assert_eq!(normalize_key("  Chess   Club "), "chess club");
//! assert_eq!(query_words("C club"), vec!["c", "club"]);
//! ```

pub mod app_data;
pub mod collation;
pub mod progress;
pub mod tokenizer;

pub use app_data::*;
pub use collation::*;
pub use tokenizer::*;
