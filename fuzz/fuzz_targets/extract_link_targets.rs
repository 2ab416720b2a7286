#![no_main]

use libfuzzer_sys::fuzz_target;

use wikilinks_path::indexer::parse::extract_link_targets;

// Fuzzes wiki-link extraction against arbitrary text: every extracted
// target must be a genuine substring of the input (proving the regex
// match plus trim never invents characters), and the function must never
// panic regardless of how badly bracket nesting is malformed.
fuzz_target!(|text: &str| {
    for target in extract_link_targets(text) {
        assert!(!target.is_empty());
        assert!(text.contains(&target));
    }
});
