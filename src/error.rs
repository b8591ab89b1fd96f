//! Error types for index construction and page fetching.
//!
//! Nothing in here is fatal to the engine. Index errors are logged and the
//! offending entry skipped; fetch errors are reported alongside the last good
//! result set.

use thiserror::Error;

/// Errors raised while building the prefix index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Key was empty (or whitespace only) after normalization
    #[error("Invalid index key: {raw:?} is empty after normalization")]
    InvalidKey {
        /// The key as supplied, before normalization
        raw: String,
    },
}

/// Errors reported by a club page source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The source could not be reached or read
    #[error("Failed to fetch page {page}: {message}")]
    Unavailable {
        /// Page that was requested
        page: u32,
        /// Underlying cause
        message: String,
    },

    /// The source answered with something that is not a club page
    #[error("Malformed page {page}: {message}")]
    Malformed {
        /// Page that was requested
        page: u32,
        /// Decoder message
        message: String,
    },
}

impl FetchError {
    /// Page number the failed request was for
    pub fn page(&self) -> u32 {
        match self {
            FetchError::Unavailable { page, .. } | FetchError::Malformed { page, .. } => *page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Unavailable {
            page: 3,
            message: "connection reset".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch page 3: connection reset");
        assert_eq!(err.page(), 3);
    }

    #[test]
    fn test_invalid_key_display() {
        let err = IndexError::InvalidKey {
            raw: "   ".to_string(),
        };
        assert!(err.to_string().contains("empty after normalization"));
    }
}
