//! Base-sensitivity collation for club names.
//!
//! Two names compare equal here when they differ only in case or accents.
//! "Café" and "cafe" collate together, "cafe" and "cage" do not.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Build the comparison key for a name: NFD, combining marks dropped, lowercased
pub fn collation_key(name: &str) -> String {
    name.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn compare(a: &str, b: &str) -> Ordering {
        collation_key(a).cmp(&collation_key(b))
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(compare("Chess Club", "chess club"), Ordering::Equal);
    }

    #[test]
    fn test_accent_insensitive() {
        assert_eq!(compare("Café", "cafe"), Ordering::Equal);
        assert_eq!(compare("Ñandú", "nandu"), Ordering::Equal);
    }

    #[test]
    fn test_letter_identity_matters() {
        assert_eq!(compare("cafe", "cage"), Ordering::Less);
        assert_eq!(compare("Zebra", "apple"), Ordering::Greater);
    }

    #[test]
    fn test_accented_sorts_with_base_letter() {
        // É sorts between D and F, not after Z
        assert_eq!(compare("Éclair", "Dance"), Ordering::Greater);
        assert_eq!(compare("Éclair", "Fencing"), Ordering::Less);
    }
}
