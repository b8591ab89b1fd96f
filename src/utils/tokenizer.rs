use unicode_normalization::UnicodeNormalization;

/// Normalize a club name or alias into an index key.
///
/// NFKC, Unicode lowercase, trimmed, internal whitespace runs collapsed to a
/// single space. Idempotent: `normalize_key(&normalize_key(s)) == normalize_key(s)`.
pub fn normalize_key(raw: &str) -> String {
    let folded: String = raw.nfkc().collect::<String>().to_lowercase();

    let mut key = String::with_capacity(folded.len());
    for word in folded.split_whitespace() {
        if !key.is_empty() {
            key.push(' ');
        }
        key.push_str(word);
    }
    key
}

/// Split a normalized key into its sub-words
pub fn sub_words(key: &str) -> impl Iterator<Item = &str> {
    key.split_whitespace()
}

/// Extract normalized query words from free text.
/// Blank input yields no words.
pub fn query_words(text: &str) -> Vec<String> {
    normalize_key(text)
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
