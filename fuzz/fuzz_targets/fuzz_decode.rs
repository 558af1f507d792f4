#![no_main]

use libfuzzer_sys::fuzz_target;

use psum_core::codec::{decode, encode};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic; anything accepted must re-encode to
    // the canonical form and decode to the same value.
    let limit = 4096;
    if let Ok(value) = decode(data, limit) {
        let bytes = encode(&value, limit + 8).expect("decoded value re-encodes");
        assert_eq!(decode(&bytes, limit + 8).expect("canonical form decodes"), value);
    }
});
