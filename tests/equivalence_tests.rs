//! Equivalence tests
//!
//! Exercises each comparison tier in order:
//! - same EPSG code
//! - identical proj4 strings
//! - matching WKT (per dialect, after canonicalization)
//! - deep projection parameters

use ferro_srs::equivalence::{EquivalenceChecker, EquivalenceLevel};
use ferro_srs::params::ProjParams;
use ferro_srs::registry::Registry;
use ferro_srs::wkt::canonicalize;
use ferro_srs::{
    equivalent, equivalent_with, srs, EquivalenceOptions, IdentifyConfig, Proj4js, SrsError,
    SrsIdentifier, SrsOverrides, WktComparison, USER_DEFINED_CODE,
};
use rstest::rstest;

const WGS84_OGC: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AUTHORITY["EPSG","4326"]]"#;

const WGS84_OGC_REORDERED: &str = r#"GEOGCS["WGS 84",AUTHORITY["EPSG","4326"],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],DATUM["WGS_1984",AUTHORITY["EPSG","6326"],SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]]]]"#;

const CUSTOM_ESRI_UTM33: &str = r#"PROJCS["WGS_1984_UTM_Zone_33N",GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["Degree",0.017453292519943295]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",15],PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],PARAMETER["false_northing",0],UNIT["Meter",1]]"#;

const CUSTOM_ESRI_UTM33_REORDERED: &str = r#"PROJCS["WGS_1984_UTM_Zone_33N",UNIT["Meter",1],PARAMETER["false_northing",0],PARAMETER["false_easting",500000],PARAMETER["scale_factor",0.9996],PARAMETER["central_meridian",15],PARAMETER["latitude_of_origin",0],PROJECTION["Transverse_Mercator"],GEOGCS["GCS_WGS_1984",UNIT["Degree",0.017453292519943295],PRIMEM["Greenwich",0],DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137,298.257223563]]]]"#;

const UTM33_PROJ4: &str = "+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs";

fn level(a: &str, b: &str) -> EquivalenceLevel {
    SrsIdentifier::global().compare(a, b).unwrap().level
}

// =============================================================================
// Reflexivity
// =============================================================================

#[rstest]
#[case("4326")]
#[case("EPSG:4326")]
#[case("EPSG:3857")]
#[case("EPSG:99999")]
#[case(WGS84_OGC)]
#[case(CUSTOM_ESRI_UTM33)]
#[case("+proj=longlat +datum=WGS84 +no_defs")]
#[case("+proj=merc +lon_0=10 +datum=WGS84 +units=m")]
#[case(UTM33_PROJ4)]
fn test_reflexive(#[case] input: &str) {
    assert!(equivalent(input, input).unwrap(), "{} != itself", input);
}

#[test]
fn test_reflexive_object_and_descriptor() {
    let object = serde_json::json!({ "crs": WGS84_OGC });
    assert!(equivalent(object.clone(), object).unwrap());

    let built = srs(27700).unwrap().into_owned();
    assert!(equivalent(&built, &built).unwrap());
    assert!(built.eq_input(&built).unwrap());
}

// =============================================================================
// Code tier
// =============================================================================

#[rstest]
#[case("4326", "EPSG:4326")]
#[case("EPSG:3857", "3857")]
#[case(WGS84_OGC, "EPSG:4326")]
#[case(WGS84_OGC, WGS84_OGC_REORDERED)]
#[case("+proj=longlat +datum=WGS84 +no_defs", "4326")]
#[case("+init=epsg:3857", "EPSG:3857")]
#[case("+proj=utm +zone=17 +datum=WGS84 +units=m +no_defs", "EPSG:32617")]
fn test_code_tier(#[case] a: &str, #[case] b: &str) {
    assert_eq!(level(a, b), EquivalenceLevel::Code);
    assert_eq!(level(b, a), EquivalenceLevel::Code);
}

#[test]
fn test_number_and_string_codes() {
    assert!(equivalent(4326, "EPSG:4326").unwrap());
    assert!(equivalent(4326, "4326").unwrap());
    assert!(equivalent(4326u32, serde_json::json!(4326)).unwrap());
    assert!(srs(4326).unwrap().eq_input("EPSG:4326").unwrap());
}

#[test]
fn test_esri_text_matches_code() {
    let esri = Registry::global()
        .entry("EPSG:3857")
        .and_then(|entry| entry.esriwkt.clone())
        .unwrap();
    assert!(equivalent(esri.as_str(), 3857).unwrap());
}

#[rstest]
#[case("4326", "3857")]
#[case("EPSG:4326", "EPSG:4269")]
#[case("EPSG:32617", "EPSG:27700")]
#[case("EPSG:27700", "EPSG:2154")]
fn test_different_codes(#[case] a: &str, #[case] b: &str) {
    assert!(!equivalent(a, b).unwrap());
}

#[test]
fn test_reused_wkt_name_with_other_datum() {
    let airy = r#"GEOGCS["WGS 84",DATUM["OSGB_1936",SPHEROID["Airy 1830",6377563.396,299.3249646]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#;
    assert_eq!(srs(airy).unwrap().code(), None);
    assert!(!equivalent(airy, 4326).unwrap());
    assert!(equivalent(airy, airy).unwrap());
}

#[test]
fn test_reordered_wkt_canonical_forms_match() {
    assert_eq!(
        canonicalize(WGS84_OGC).unwrap(),
        canonicalize(WGS84_OGC_REORDERED).unwrap()
    );
    assert!(equivalent(WGS84_OGC, WGS84_OGC_REORDERED).unwrap());
}

// =============================================================================
// Sentinel handling
// =============================================================================

fn custom(proj4: &str) -> ferro_srs::Srs {
    SrsIdentifier::global()
        .identify_with(
            USER_DEFINED_CODE,
            SrsOverrides::new().with_proj4js(Proj4js {
                name: None,
                obj: ProjParams::from_proj4(proj4),
            }),
        )
        .unwrap()
        .into_owned()
}

#[test]
fn test_sentinel_with_different_params_not_equivalent() {
    let a = custom("+proj=merc +lon_0=10 +datum=WGS84");
    let b = custom("+proj=merc +lon_0=20 +datum=WGS84");
    assert!(!equivalent(&a, &b).unwrap());
}

#[test]
fn test_sentinel_with_same_params_matches_on_parameters() {
    let a = custom("+proj=merc +lon_0=10 +datum=WGS84");
    let b = custom("+datum=WGS84 +lon_0=10 +proj=merc");
    let result = EquivalenceChecker::default().check(&a, &b);
    assert_eq!(result.level, EquivalenceLevel::Parameters);
}

#[test]
fn test_bare_sentinels_not_equivalent() {
    assert!(!equivalent(USER_DEFINED_CODE, USER_DEFINED_CODE).unwrap());
}

// =============================================================================
// proj4, WKT and parameter tiers
// =============================================================================

#[test]
fn test_proj4_tier() {
    let text = "+proj=merc +lon_0=10 +datum=WGS84 +units=m";
    assert_eq!(level(text, text), EquivalenceLevel::Proj4);
}

#[test]
fn test_custom_wkt_tier() {
    assert_eq!(
        level(CUSTOM_ESRI_UTM33, CUSTOM_ESRI_UTM33_REORDERED),
        EquivalenceLevel::Wkt
    );
}

#[test]
fn test_composite_mode_falls_to_parameters() {
    let identifier = SrsIdentifier::new(
        Registry::global(),
        IdentifyConfig::default().with_wkt_comparison(WktComparison::Composite),
    );
    let result = identifier
        .compare(CUSTOM_ESRI_UTM33, CUSTOM_ESRI_UTM33_REORDERED)
        .unwrap();
    assert_eq!(result.level, EquivalenceLevel::Parameters);

    let same = identifier
        .compare(CUSTOM_ESRI_UTM33, CUSTOM_ESRI_UTM33)
        .unwrap();
    assert_eq!(same.level, EquivalenceLevel::Wkt);
}

#[test]
fn test_proj4_and_esri_wkt_match_on_parameters() {
    let result = SrsIdentifier::global()
        .compare(UTM33_PROJ4, CUSTOM_ESRI_UTM33)
        .unwrap();
    assert_eq!(result.level, EquivalenceLevel::Parameters);
    assert!(result.is_equivalent());
}

#[test]
fn test_parameter_mismatch() {
    let other_zone = "+proj=utm +zone=34 +datum=WGS84 +units=m +no_defs";
    assert!(!equivalent(other_zone, CUSTOM_ESRI_UTM33).unwrap());
    assert!(!equivalent(other_zone, UTM33_PROJ4).unwrap());
}

#[test]
fn test_missing_params_is_not_equivalent() {
    let result = SrsIdentifier::global()
        .compare(CUSTOM_ESRI_UTM33, "not a projection")
        .unwrap();
    assert_eq!(result.level, EquivalenceLevel::NotEquivalent);
    assert!(!equivalent("not a projection", "not a projection").unwrap());
}

// =============================================================================
// Options and errors
// =============================================================================

#[test]
fn test_debug_option_does_not_change_outcome() {
    let debug = EquivalenceOptions { debug: true };
    assert!(equivalent_with(4326, "EPSG:4326", debug).unwrap());
    assert!(!equivalent_with(4326, 3857, debug).unwrap());
    assert!(equivalent_with(UTM33_PROJ4, CUSTOM_ESRI_UTM33, debug).unwrap());
}

#[test]
fn test_proj4_title_does_not_fail() {
    let titled = "+proj=merc +lon_0=10 +datum=WGS84 +title=epsg:9999";
    assert!(equivalent(titled, "+proj=merc +lon_0=10 +datum=WGS84").unwrap());
}

#[test]
fn test_registry_error_propagates() {
    let err = equivalent("+init=epsg:99999 +proj=longlat", 4326).unwrap_err();
    assert!(matches!(err, SrsError::RegistryLookup { .. }));
}
