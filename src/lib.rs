// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-srs: spatial reference system identification and equivalence
//!
//! Builds a normalized [`Srs`] descriptor from an EPSG code, an `EPSG:<n>`
//! string, OGC or ESRI WKT, a proj4 definition, or an object graph that embeds
//! one of these, and decides whether two differently encoded inputs denote the
//! same coordinate system.
//!
//! # Example
//!
//! ```
//! use ferro_srs::{equivalent, srs};
//!
//! // Identify a coordinate system from its EPSG code
//! let wgs84 = srs(4326).unwrap();
//! assert_eq!(wgs84.id(), Some("EPSG:4326"));
//! assert!(wgs84.proj4().unwrap().contains("+proj=longlat"));
//!
//! // Compare two encodings of the same system
//! assert!(equivalent(4326, "EPSG:4326").unwrap());
//! assert!(!equivalent(4326, 3857).unwrap());
//! ```

/// Emit a tracing event at a level picked at runtime, `INFO` or `DEBUG`.
macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {
        if $level == ::tracing::Level::INFO {
            ::tracing::info!($($arg)+)
        } else {
            ::tracing::debug!($($arg)+)
        }
    };
}

pub mod cli;
pub mod config;
pub mod equivalence;
pub mod error;
pub mod object;
pub mod params;
pub mod registry;
pub mod srs;
pub mod wkt;

use std::borrow::Cow;

// Re-export commonly used types
pub use config::{FerroSrsConfig, IdentifyConfig, ObjectCodePolicy, WktComparison};
pub use equivalence::{EquivalenceChecker, EquivalenceLevel, EquivalenceOptions, EquivalenceResult};
pub use error::{ErrorCode, SrsError};
pub use object::{ObjectNode, ObjectValue};
pub use params::ProjParams;
pub use registry::Registry;
pub use srs::{Proj4js, Srs, SrsIdentifier, SrsInput, SrsOverrides, WktPair, USER_DEFINED_CODE};

/// Result type alias for ferro-srs operations
pub type Result<T> = std::result::Result<T, SrsError>;

/// Identify `input` with the default identifier and built-in registry.
///
/// An already-built descriptor is returned as the same instance
/// ([`Cow::Borrowed`]); every other input yields a new descriptor.
///
/// # Errors
///
/// Returns [`SrsError::RegistryLookup`] when proj4 text names an EPSG code
/// with no registered projection definition.
pub fn srs<'a>(input: impl Into<SrsInput<'a>>) -> Result<Cow<'a, Srs>> {
    SrsIdentifier::global().identify(input)
}

/// Returns true if both inputs denote the same coordinate system.
pub fn equivalent<'a, 'b>(a: impl Into<SrsInput<'a>>, b: impl Into<SrsInput<'b>>) -> Result<bool> {
    SrsIdentifier::global().equivalent(a, b)
}

/// Like [`equivalent`], with per-call options such as debug logging.
pub fn equivalent_with<'a, 'b>(
    a: impl Into<SrsInput<'a>>,
    b: impl Into<SrsInput<'b>>,
    options: EquivalenceOptions,
) -> Result<bool> {
    Ok(SrsIdentifier::global()
        .compare_with(a, b, options)?
        .is_equivalent())
}
