//! Well-known text (WKT) support.
//!
//! This module covers the parts of WKT handling that SRS identification needs:
//!
//! - [`parse_wkt`]: a nom parser producing a [`WktNode`] tree
//! - [`is_wkt`]: the validity classifier used to route string inputs
//! - [`canonicalize`]: a parse / sort / serialize round trip so that raw string
//!   comparisons are insensitive to child node ordering
//!
//! Both OGC (WKT1 with `AUTHORITY` nodes, or WKT2 with `ID` nodes) and ESRI
//! dialects share the same bracketed syntax and are handled by one grammar.
//!
//! # Example
//!
//! ```
//! use ferro_srs::wkt::{canonicalize, is_wkt, parse_wkt};
//!
//! let text = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]]]"#;
//! assert!(is_wkt(text));
//!
//! let node = parse_wkt(text).unwrap();
//! assert_eq!(node.keyword, "GEOGCS");
//! assert_eq!(node.name(), Some("WGS 84"));
//! assert!(canonicalize(text).is_some());
//! ```

mod canonical;
mod parser;

pub use canonical::{canonicalize, canonicalize_node};
pub use parser::{parse_wkt, MAX_WKT_DEPTH};

use std::fmt;

/// Root keywords accepted as a coordinate reference system definition.
pub const CRS_KEYWORDS: &[&str] = &[
    "GEOGCS",
    "PROJCS",
    "GEOCCS",
    "VERT_CS",
    "LOCAL_CS",
    "COMPD_CS",
    "FITTED_CS",
    "GEOGCRS",
    "GEODCRS",
    "GEODETICCRS",
    "GEOGRAPHICCRS",
    "PROJCRS",
    "PROJECTEDCRS",
    "VERTCRS",
    "VERTICALCRS",
    "ENGCRS",
    "ENGINEERINGCRS",
    "COMPOUNDCRS",
    "BOUNDCRS",
];

/// A single argument of a WKT node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WktValue {
    /// Nested keyword node, e.g. `DATUM[...]`
    Node(WktNode),
    /// Quoted string with `""` escapes already resolved
    Text(String),
    /// Number, kept as written so serialization does not reformat it
    Number(String),
    /// Bare enumeration word, e.g. `EAST` in `AXIS["Easting",EAST]`
    Keyword(String),
}

impl WktValue {
    /// Numeric value, if this argument is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            WktValue::Number(raw) => raw.parse().ok(),
            _ => None,
        }
    }

    /// String value, if this argument is quoted text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            WktValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for WktValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WktValue::Node(node) => write!(f, "{}", node),
            WktValue::Text(text) => write!(f, "\"{}\"", text.replace('"', "\"\"")),
            WktValue::Number(raw) => write!(f, "{}", raw),
            WktValue::Keyword(word) => write!(f, "{}", word),
        }
    }
}

/// A WKT keyword node with its bracketed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WktNode {
    /// Keyword as written (`GEOGCS`, `Datum`, ...)
    pub keyword: String,
    /// Arguments in source order
    pub args: Vec<WktValue>,
}

impl WktNode {
    /// Create a node from a keyword and its arguments.
    pub fn new(keyword: impl Into<String>, args: Vec<WktValue>) -> Self {
        Self {
            keyword: keyword.into(),
            args,
        }
    }

    /// Returns true if the keyword matches, ignoring ASCII case.
    pub fn is(&self, keyword: &str) -> bool {
        self.keyword.eq_ignore_ascii_case(keyword)
    }

    /// The first quoted argument, which WKT uses as the object name.
    pub fn name(&self) -> Option<&str> {
        self.args.first().and_then(WktValue::as_text)
    }

    /// Iterate over the direct child nodes.
    pub fn children(&self) -> impl Iterator<Item = &WktNode> {
        self.args.iter().filter_map(|arg| match arg {
            WktValue::Node(node) => Some(node),
            _ => None,
        })
    }

    /// First direct child with one of the given keywords.
    pub fn child(&self, keywords: &[&str]) -> Option<&WktNode> {
        self.children()
            .find(|child| keywords.iter().any(|k| child.is(k)))
    }

    /// Numeric argument at `index` (counting all argument kinds).
    pub fn number_at(&self, index: usize) -> Option<f64> {
        self.args.get(index).and_then(WktValue::as_f64)
    }

    /// Depth-first search for the first node with one of the given keywords.
    pub fn find(&self, keywords: &[&str]) -> Option<&WktNode> {
        if keywords.iter().any(|k| self.is(k)) {
            return Some(self);
        }
        self.children().find_map(|child| child.find(keywords))
    }

    /// Returns true if this node's keyword names a coordinate reference system.
    pub fn is_crs(&self) -> bool {
        CRS_KEYWORDS.iter().any(|k| self.is(k))
    }
}

impl fmt::Display for WktNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.keyword)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, "]")
    }
}

/// Returns true if `text` is well-formed WKT describing a coordinate reference system.
///
/// The whole (trimmed) input must parse and the root keyword must be one of
/// [`CRS_KEYWORDS`].
pub fn is_wkt(text: &str) -> bool {
    match parse_wkt(text) {
        Ok(node) => node.is_crs(),
        Err(_) => false,
    }
}
