//! Property-based tests for SRS identification and equivalence
//!
//! Uses proptest to check invariants that must hold for any input:
//! - identification never panics, whatever the text
//! - equivalence is reflexive and symmetric for supported shapes
//! - WKT canonicalization is idempotent and insensitive to child order

use ferro_srs::wkt::{canonicalize, parse_wkt};
use ferro_srs::{equivalent, srs, SrsError, SrsIdentifier, USER_DEFINED_CODE};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

// =============================================================================
// Strategies
// =============================================================================

/// Codes from the built-in dataset.
fn known_code() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(4326u32),
        Just(4269),
        Just(3857),
        Just(3395),
        Just(32617),
        Just(27700),
        Just(2154),
    ]
}

/// Any code except the user-defined sentinel.
fn any_code() -> impl Strategy<Value = u32> {
    prop_oneof![known_code(), 1..100_000u32].prop_filter("sentinel", |c| *c != USER_DEFINED_CODE)
}

/// A proj4 definition with no EPSG code.
fn custom_proj4() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("merc"), Just("tmerc"), Just("longlat")],
        -180i32..180,
        prop_oneof![Just("WGS84"), Just("NAD83")],
    )
        .prop_map(|(proj, lon, datum)| {
            format!("+proj={} +lon_0={} +datum={} +units=m", proj, lon, datum)
        })
}

/// A child node like `PARAMETER["x",12]`.
fn wkt_child() -> impl Strategy<Value = String> {
    ("[A-Z][A-Z_]{0,7}", "[a-z ]{0,6}", 0u32..10_000)
        .prop_map(|(keyword, name, value)| format!("{}[\"{}\",{}]", keyword, name, value))
}

/// A `LOCAL_CS` root with a shuffled copy of its children.
fn wkt_pair() -> impl Strategy<Value = (String, String)> {
    prop::collection::vec(wkt_child(), 0..6)
        .prop_flat_map(|children| {
            let shuffled = Just(children.clone()).prop_shuffle();
            (Just(children), shuffled)
        })
        .prop_map(|(children, shuffled)| {
            let build = |parts: Vec<String>| {
                let mut text = String::from("LOCAL_CS[\"root\"");
                for part in parts {
                    text.push(',');
                    text.push_str(&part);
                }
                text.push(']');
                text
            };
            (build(children), build(shuffled))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // -------------------------------------------------------------------------
    // Robustness
    // -------------------------------------------------------------------------

    /// Identification of arbitrary text never panics; only a registry miss errors
    #[test]
    fn test_identify_arbitrary_text(text in ".*") {
        match srs(text.as_str()) {
            Ok(_) => {}
            Err(err) => {
                let is_lookup = matches!(err, SrsError::RegistryLookup { .. });
                prop_assert!(is_lookup);
            }
        }
    }

    /// The WKT parser rejects or accepts, but never panics
    #[test]
    fn test_parse_wkt_arbitrary_text(text in "[A-Z\\[\\]\\(\\)\",0-9 ._-]{0,64}") {
        let _ = parse_wkt(&text);
    }

    // -------------------------------------------------------------------------
    // Equivalence
    // -------------------------------------------------------------------------

    /// A number and its `EPSG:<n>` and digit-string forms are equivalent
    #[test]
    fn test_code_forms_equivalent(code in any_code()) {
        let epsg_form = format!("EPSG:{}", code);
        let eq_epsg = equivalent(code, epsg_form).unwrap();
        prop_assert!(eq_epsg);
        prop_assert!(equivalent(code.to_string(), code).unwrap());
    }

    /// Registry-backed descriptors equal themselves and differ from other codes
    #[test]
    fn test_known_codes(a in known_code(), b in known_code()) {
        let x = srs(a).unwrap();
        let y = srs(b).unwrap();
        prop_assert!(x.eq_input(&*x).unwrap());
        prop_assert_eq!(x.eq_input(&*y).unwrap(), a == b);
    }

    /// Custom proj4 definitions are reflexive and comparisons are symmetric
    #[test]
    fn test_custom_proj4(a in custom_proj4(), b in custom_proj4()) {
        let identifier = SrsIdentifier::global();
        prop_assert!(identifier.equivalent(a.as_str(), a.as_str()).unwrap());
        prop_assert_eq!(
            identifier.equivalent(a.as_str(), b.as_str()).unwrap(),
            identifier.equivalent(b.as_str(), a.as_str()).unwrap()
        );
    }

    // -------------------------------------------------------------------------
    // Canonical WKT
    // -------------------------------------------------------------------------

    /// Canonicalization is idempotent and ignores child order
    #[test]
    fn test_canonicalize_order_insensitive((text, shuffled) in wkt_pair()) {
        let canonical = canonicalize(&text);
        prop_assert!(canonical.is_some(), "did not parse: {}", text);
        let canonical = canonical.unwrap();
        prop_assert_eq!(canonicalize(&canonical), Some(canonical.clone()));
        prop_assert_eq!(canonicalize(&shuffled), Some(canonical));
    }
}
