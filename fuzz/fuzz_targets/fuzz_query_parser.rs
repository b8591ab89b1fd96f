#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary input, including unterminated quotes and stray colons, must not panic
    let parsed = clubfind::query::parse_query(data);
    let _ = parsed.words();
});
