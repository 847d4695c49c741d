//! SRS equivalence checking.
//!
//! This module decides whether two descriptors denote the same coordinate
//! reference system, even when they were built from different encodings.
//!
//! # Examples
//!
//! ```
//! use ferro_srs::srs;
//! use ferro_srs::equivalence::{EquivalenceChecker, EquivalenceLevel};
//!
//! let checker = EquivalenceChecker::default();
//!
//! let a = srs(4326).unwrap();
//! let b = srs("EPSG:4326").unwrap();
//!
//! let result = checker.check(&a, &b);
//! assert_eq!(result.level, EquivalenceLevel::Code);
//! ```
//!
//! # Equivalence Levels
//!
//! Tiers are tried in order and the first match wins:
//!
//! - **Code**: same EPSG code, neither being the user-defined sentinel `32767`
//! - **Proj4**: identical proj4 strings
//! - **Wkt**: matching WKT texts
//! - **Parameters**: same projection name, ellipsoid axes, origin, scale,
//!   units and datum in the parsed parameter objects
//! - **NotEquivalent**: none of the above

mod checker;

pub use checker::{EquivalenceChecker, EquivalenceLevel, EquivalenceOptions, EquivalenceResult};
