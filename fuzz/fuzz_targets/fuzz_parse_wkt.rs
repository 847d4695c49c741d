//! Fuzz target for the WKT parser and canonicalizer
//!
//! Feeds arbitrary byte strings to the parser to find crashes, panics, or
//! stack exhaustion on deeply nested input.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() > 4000 {
            return;
        }

        // Canonical output must parse and be stable
        if let Some(canonical) = ferro_srs::wkt::canonicalize(input) {
            assert_eq!(
                ferro_srs::wkt::canonicalize(&canonical).as_deref(),
                Some(canonical.as_str())
            );
        }
    }
});
