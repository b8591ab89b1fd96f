#![no_main]

use arbitrary::Arbitrary;
use clubfind::index::PrefixIndex;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    keys: Vec<String>,
    query: Vec<String>,
}

fuzz_target!(|input: Input| {
    let mut index = PrefixIndex::new();
    let mut inserted = Vec::new();
    for raw in &input.keys {
        if let Ok(id) = index.insert(raw) {
            if let Some(key) = index.key(id) {
                inserted.push(key.to_string());
            }
        }
    }

    let matches = index.words_matching_all_prefixes(&input.query, inserted.iter().map(String::as_str));
    for key in matches {
        assert!(index.contains_key(key));
    }
});
