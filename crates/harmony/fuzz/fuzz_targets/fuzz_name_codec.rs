//! Fuzz target for the name codec.
//!
//! This fuzzer tests that:
//! 1. `decode` never panics on arbitrary text
//! 2. Anything `decode` accepts re-encodes to the same text
//! 3. `encode` output always decodes back to its input

#![no_main]

use harmony::export::naming::{decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    if let Ok(decoded) = decode(&input) {
        assert_eq!(encode(&decoded), input);
    }

    let encoded = encode(&input);
    assert_eq!(decode(&encoded).expect("encoded names decode"), input);
});
