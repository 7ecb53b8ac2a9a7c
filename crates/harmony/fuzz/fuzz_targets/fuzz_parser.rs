//! Fuzz target for the data parser and classifier.
//!
//! This fuzzer tests that parsing and classifying arbitrary bytes never
//! panics, for every supported delimiter.

#![no_main]

use harmony::FieldClassifier;
use harmony::input::Parser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    let classifier = FieldClassifier::new();
    for delimiter in [b',', b'\t', b';', b'|'] {
        if let Ok(table) = parser.parse_bytes(data, delimiter) {
            let _ = classifier.classify_table(&table);
        }
    }
});
