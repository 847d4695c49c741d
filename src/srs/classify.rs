//! Input classification

use super::Srs;
use crate::object::{ObjectNode, ObjectValue};
use crate::wkt::is_wkt;
use once_cell::sync::Lazy;
use regex::Regex;

static EPSG_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^EPSG:(\d+)$").unwrap());

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// A raw value handed to the identifier.
#[derive(Debug, Clone)]
pub enum SrsInput<'a> {
    /// An already-built descriptor, returned as-is
    Normalized(&'a Srs),
    /// Numeric EPSG code
    Code(u32),
    /// Text: `EPSG:<n>`, digits, WKT or proj4
    Text(String),
    /// Generic object graph
    Object(ObjectValue),
    /// A value with no usable shape (null, boolean, out-of-range number)
    Empty,
}

/// The branch chosen for an input.
#[derive(Debug, Clone)]
pub enum InputClass<'a> {
    Normalized(&'a Srs),
    /// Numeric code, `EPSG:<n>` or bare digits
    Code(u32),
    /// Trimmed WKT text
    Wkt(String),
    /// Trimmed proj4 text
    Proj4(String),
    Object(ObjectValue),
    Unclassified,
}

impl InputClass<'_> {
    /// Short branch name for log output.
    pub fn name(&self) -> &'static str {
        match self {
            InputClass::Normalized(_) => "normalized",
            InputClass::Code(_) => "code",
            InputClass::Wkt(_) => "wkt",
            InputClass::Proj4(_) => "proj4",
            InputClass::Object(_) => "object",
            InputClass::Unclassified => "unclassified",
        }
    }
}

/// Pick the handling branch for an input.
///
/// Text is trimmed once and the trimmed value is used for every match and
/// carried into the branch. Digit strings that do not fit a `u32` are
/// unclassified.
pub fn classify(input: SrsInput<'_>) -> InputClass<'_> {
    match input {
        SrsInput::Normalized(srs) => InputClass::Normalized(srs),
        SrsInput::Code(code) => InputClass::Code(code),
        SrsInput::Text(text) => classify_text(text),
        SrsInput::Object(value) => InputClass::Object(value),
        SrsInput::Empty => InputClass::Unclassified,
    }
}

fn classify_text<'a>(text: String) -> InputClass<'a> {
    let text = text.trim();

    if let Some(caps) = EPSG_CODE.captures(text) {
        return caps[1]
            .parse()
            .map_or(InputClass::Unclassified, InputClass::Code);
    }
    if DIGITS.is_match(text) {
        return text
            .parse()
            .map_or(InputClass::Unclassified, InputClass::Code);
    }
    if is_wkt(text) {
        return InputClass::Wkt(text.to_string());
    }
    if text.starts_with('+') {
        return InputClass::Proj4(text.to_string());
    }
    InputClass::Unclassified
}

impl<'a> From<&'a Srs> for SrsInput<'a> {
    fn from(srs: &'a Srs) -> Self {
        SrsInput::Normalized(srs)
    }
}

impl From<u32> for SrsInput<'_> {
    fn from(code: u32) -> Self {
        SrsInput::Code(code)
    }
}

impl From<u16> for SrsInput<'_> {
    fn from(code: u16) -> Self {
        SrsInput::Code(u32::from(code))
    }
}

// Unsuffixed integer literals land here.
impl From<i32> for SrsInput<'_> {
    fn from(code: i32) -> Self {
        u32::try_from(code).map_or(SrsInput::Empty, SrsInput::Code)
    }
}

impl From<i64> for SrsInput<'_> {
    fn from(code: i64) -> Self {
        u32::try_from(code).map_or(SrsInput::Empty, SrsInput::Code)
    }
}

impl From<&str> for SrsInput<'_> {
    fn from(text: &str) -> Self {
        SrsInput::Text(text.to_string())
    }
}

impl From<String> for SrsInput<'_> {
    fn from(text: String) -> Self {
        SrsInput::Text(text)
    }
}

impl From<&String> for SrsInput<'_> {
    fn from(text: &String) -> Self {
        SrsInput::Text(text.clone())
    }
}

impl From<ObjectValue> for SrsInput<'_> {
    fn from(value: ObjectValue) -> Self {
        match value {
            ObjectValue::Str(text) => SrsInput::Text(text),
            ObjectValue::Num(n) => number_input(n),
            ObjectValue::Null | ObjectValue::Bool(_) => SrsInput::Empty,
            other => SrsInput::Object(other),
        }
    }
}

impl From<ObjectNode> for SrsInput<'_> {
    fn from(node: ObjectNode) -> Self {
        SrsInput::Object(ObjectValue::Node(node))
    }
}

impl From<serde_json::Value> for SrsInput<'_> {
    fn from(value: serde_json::Value) -> Self {
        ObjectValue::from(value).into()
    }
}

/// A whole number that fits a `u32` is a code; anything else is empty.
fn number_input(n: f64) -> SrsInput<'static> {
    if n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&n) {
        SrsInput::Code(n as u32)
    } else {
        SrsInput::Empty
    }
}
