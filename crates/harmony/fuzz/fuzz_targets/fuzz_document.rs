//! Fuzz target for mapping document loading.
//!
//! This fuzzer tests that malformed documents are rejected with an error,
//! never a panic, and that accepted documents survive a round trip.

#![no_main]

use harmony::MappingDocument;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    if let Ok(document) = MappingDocument::from_document_form(&value) {
        let again = MappingDocument::from_document_form(&document.to_document_form())
            .expect("rendered documents reload");
        assert_eq!(again.len(), document.len());
    }
});
