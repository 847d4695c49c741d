//! Performance benchmarks for ferro-srs
//!
//! Run with: cargo bench
//! Run specific benchmark: cargo bench -- identify

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferro_srs::registry::Registry;
use ferro_srs::wkt::{canonicalize, parse_wkt};
use ferro_srs::{srs, SrsIdentifier};

const CUSTOM_ESRI_UTM33: &str = r#"PROJCS["WGS_1984_UTM_Zone_33N",GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["Degree",0.017453292519943295]],PROJECTION["Transverse_Mercator"],PARAMETER["latitude_of_origin",0],PARAMETER["central_meridian",15],PARAMETER["scale_factor",0.9996],PARAMETER["false_easting",500000],PARAMETER["false_northing",0],UNIT["Meter",1]]"#;

fn registry_wkt(id: &str) -> String {
    Registry::global()
        .entry(id)
        .and_then(|entry| entry.wkt.clone())
        .unwrap_or_default()
}

// =============================================================================
// Identification benchmarks
// =============================================================================

/// Benchmark identification for each input shape
fn bench_identify(c: &mut Criterion) {
    let ogc = registry_wkt("EPSG:32617");
    let inputs = vec![
        ("code", "4326".to_string()),
        ("epsg", "EPSG:3857".to_string()),
        ("ogc_wkt", ogc),
        ("esri_wkt", CUSTOM_ESRI_UTM33.to_string()),
        (
            "proj4_known",
            "+proj=utm +zone=17 +datum=WGS84 +units=m +no_defs".to_string(),
        ),
        (
            "proj4_custom",
            "+proj=merc +lon_0=10 +datum=WGS84 +units=m".to_string(),
        ),
    ];

    let mut group = c.benchmark_group("identify");

    for (name, input) in &inputs {
        group.bench_with_input(BenchmarkId::new("shape", name), input, |b, v| {
            b.iter(|| srs(black_box(v.as_str())))
        });
    }

    group.finish();
}

/// Benchmark object graph walking
fn bench_identify_object(c: &mut Criterion) {
    let value = serde_json::json!({
        "name": "layer",
        "fields": ["a", "b", "c"],
        "crs": { "type": "name", "properties": { "wkt": registry_wkt("EPSG:3857") } },
    });

    c.bench_function("identify_object", |b| {
        b.iter(|| srs(black_box(value.clone())))
    });
}

// =============================================================================
// Equivalence benchmarks
// =============================================================================

/// Benchmark each comparison tier
fn bench_equivalence(c: &mut Criterion) {
    let identifier = SrsIdentifier::global();
    let cases = vec![
        ("code", "4326", "EPSG:4326"),
        (
            "proj4",
            "+proj=merc +lon_0=10 +datum=WGS84",
            "+proj=merc +lon_0=10 +datum=WGS84",
        ),
        ("wkt", CUSTOM_ESRI_UTM33, CUSTOM_ESRI_UTM33),
        (
            "parameters",
            "+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs",
            CUSTOM_ESRI_UTM33,
        ),
        ("not_equivalent", "4326", "3857"),
    ];

    let mut group = c.benchmark_group("equivalence");

    for (name, a, bb) in &cases {
        group.bench_function(BenchmarkId::new("tier", name), |b| {
            b.iter(|| identifier.equivalent(black_box(*a), black_box(*bb)))
        });
    }

    group.finish();
}

// =============================================================================
// WKT benchmarks
// =============================================================================

/// Benchmark WKT parsing and canonicalization by text length
fn bench_wkt(c: &mut Criterion) {
    let texts = vec![
        ("geographic", registry_wkt("EPSG:4326")),
        ("projected", registry_wkt("EPSG:27700")),
        ("esri", CUSTOM_ESRI_UTM33.to_string()),
    ];

    let mut group = c.benchmark_group("wkt");

    for (name, text) in &texts {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", name), text, |b, t| {
            b.iter(|| parse_wkt(black_box(t)))
        });
        group.bench_with_input(BenchmarkId::new("canonicalize", name), text, |b, t| {
            b.iter(|| canonicalize(black_box(t)))
        });
    }

    group.finish();
}

/// Benchmark registry construction from the embedded dataset
fn bench_registry(c: &mut Criterion) {
    c.bench_function("registry_builtin", |b| b.iter(Registry::builtin));
}

criterion_group!(
    benches,
    bench_identify,
    bench_identify_object,
    bench_equivalence,
    bench_wkt,
    bench_registry,
);

criterion_main!(benches);
