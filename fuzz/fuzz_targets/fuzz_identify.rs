//! Fuzz target for descriptor identification
//!
//! Arbitrary text goes through classification, code extraction, WKT and
//! proj4 parsing, and the registry merge. Nothing may panic, and each input
//! must be equivalent to itself whenever it yields a code.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() > 4000 {
            return;
        }

        if let Ok(srs) = ferro_srs::srs(input) {
            if srs.id().is_some() {
                assert!(srs.eq_input(&*srs).unwrap_or(false));
            }
        }
    }
});
