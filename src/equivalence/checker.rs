//! Equivalence checker implementation.

use crate::config::WktComparison;
use crate::srs::{Srs, USER_DEFINED_CODE};
use crate::wkt::canonicalize;

/// Level at which two descriptors were found equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquivalenceLevel {
    /// Same EPSG code.
    Code,
    /// Identical proj4 strings.
    Proj4,
    /// Matching WKT texts.
    Wkt,
    /// Same deep projection parameters.
    Parameters,
    /// Not equivalent.
    NotEquivalent,
}

impl EquivalenceLevel {
    /// Returns true if the descriptors are considered equivalent.
    pub fn is_equivalent(&self) -> bool {
        !matches!(self, EquivalenceLevel::NotEquivalent)
    }

    /// Returns a human-readable description of the equivalence level.
    pub fn description(&self) -> &'static str {
        match self {
            EquivalenceLevel::Code => "Same EPSG code",
            EquivalenceLevel::Proj4 => "Identical proj4 definition",
            EquivalenceLevel::Wkt => "Matching WKT definition",
            EquivalenceLevel::Parameters => "Same projection parameters",
            EquivalenceLevel::NotEquivalent => "Not equivalent",
        }
    }
}

impl std::fmt::Display for EquivalenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Result of an equivalence check with additional details.
#[derive(Debug, Clone)]
pub struct EquivalenceResult {
    /// The determined equivalence level.
    pub level: EquivalenceLevel,
    /// Additional notes about the comparison.
    pub notes: Vec<String>,
}

impl EquivalenceResult {
    /// Create a new equivalence result.
    pub fn new(level: EquivalenceLevel) -> Self {
        Self {
            level,
            notes: Vec::new(),
        }
    }

    /// Add a note to the result.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Returns true if the descriptors are considered equivalent.
    pub fn is_equivalent(&self) -> bool {
        self.level.is_equivalent()
    }
}

/// Per-call comparison options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquivalenceOptions {
    /// Log every tier decision at info level
    pub debug: bool,
}

/// Checks equivalence between SRS descriptors.
///
/// The check is a pure function of the two descriptors; it never fails.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceChecker {
    wkt_comparison: WktComparison,
    debug: bool,
}

impl EquivalenceChecker {
    /// Create a checker with the given WKT tier mode.
    pub fn new(wkt_comparison: WktComparison) -> Self {
        Self {
            wkt_comparison,
            debug: false,
        }
    }

    /// Log tier decisions at info level instead of debug.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn level(&self) -> tracing::Level {
        if self.debug {
            tracing::Level::INFO
        } else {
            tracing::Level::DEBUG
        }
    }

    /// Check if two descriptors are equivalent.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_srs::srs;
    /// use ferro_srs::equivalence::EquivalenceChecker;
    ///
    /// let checker = EquivalenceChecker::default();
    /// let a = srs(3857).unwrap();
    /// let b = srs(4326).unwrap();
    /// assert!(!checker.check(&a, &b).is_equivalent());
    /// ```
    pub fn check(&self, a: &Srs, b: &Srs) -> EquivalenceResult {
        let level = self.level();

        event_at!(level, "Code tier: {:?} vs {:?}", a.code(), b.code());
        if let (Some(x), Some(y)) = (a.code(), b.code()) {
            if x == y && x != USER_DEFINED_CODE {
                return EquivalenceResult::new(EquivalenceLevel::Code)
                    .with_note(format!("Both descriptors are EPSG:{}", x));
            }
        }

        event_at!(level, "proj4 tier: {:?} vs {:?}", a.proj4(), b.proj4());
        if let (Some(x), Some(y)) = (a.proj4(), b.proj4()) {
            if x == y {
                return EquivalenceResult::new(EquivalenceLevel::Proj4)
                    .with_note("proj4 strings are identical");
            }
        }

        if let Some(note) = self.wkt_match(a, b) {
            event_at!(level, "WKT tier matched: {}", note);
            return EquivalenceResult::new(EquivalenceLevel::Wkt).with_note(note);
        }

        match (a.params(), b.params()) {
            (Some(x), Some(y)) => {
                let (x, y) = (x.comparison_string(), y.comparison_string());
                event_at!(level, "Parameter tier: {} vs {}", x, y);
                if x == y {
                    EquivalenceResult::new(EquivalenceLevel::Parameters)
                        .with_note("Projection parameters match")
                } else {
                    EquivalenceResult::new(EquivalenceLevel::NotEquivalent)
                        .with_note("Projection parameters differ")
                }
            }
            _ => {
                event_at!(level, "Parameter tier skipped: missing parameter object");
                EquivalenceResult::new(EquivalenceLevel::NotEquivalent)
                    .with_note("No parameter object to compare")
            }
        }
    }

    fn wkt_match(&self, a: &Srs, b: &Srs) -> Option<&'static str> {
        match self.wkt_comparison {
            WktComparison::Composite => {
                let (x, y) = (a.wkt()?, b.wkt()?);
                (x == y).then_some("WKT texts are identical")
            }
            WktComparison::Dialects => {
                if same_text(a.wkt_ogc(), b.wkt_ogc()) {
                    Some("OGC WKT texts match")
                } else if same_text(a.wkt_esri(), b.wkt_esri()) {
                    Some("ESRI WKT texts match")
                } else {
                    None
                }
            }
        }
    }

    /// Check if several descriptors are all equivalent to the first.
    pub fn all_equivalent(&self, descriptors: &[Srs]) -> bool {
        match descriptors.split_first() {
            Some((first, rest)) => rest.iter().all(|d| self.check(first, d).is_equivalent()),
            None => true,
        }
    }
}

/// Equal as written, or equal after canonicalization.
fn same_text(a: Option<&str>, b: Option<&str>) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    if a == b {
        return true;
    }
    match (canonicalize(a), canonicalize(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
