//! Error types for ferro-srs
//!
//! Most identification failures are not errors at all: unclassifiable input
//! produces an empty descriptor. The variants here cover the few conditions
//! that must reach the caller:
//! - a proj4 definition naming an EPSG code the registry does not know
//! - explicit WKT parsing requests
//! - configuration and dataset loading

use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Parse errors (E1xxx)
    /// Malformed WKT text
    InvalidWkt = 1001,
    /// WKT nested deeper than the parser allows
    WktTooDeep = 1002,

    // Registry errors (E2xxx)
    /// EPSG code missing from the projection definition table
    RegistryLookup = 2001,
    /// Definition text that is neither parseable proj4 nor WKT
    InvalidDefinition = 2002,

    // Configuration errors (E8xxx)
    /// Invalid configuration value
    InvalidConfig = 8001,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
    /// TOML parsing error
    TomlError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E2001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidWkt => "invalid WKT text",
            ErrorCode::WktTooDeep => "WKT nesting too deep",
            ErrorCode::RegistryLookup => "EPSG code not in projection definitions",
            ErrorCode::InvalidDefinition => "unparseable projection definition",
            ErrorCode::InvalidConfig => "invalid configuration",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
            ErrorCode::TomlError => "TOML parsing error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A span in the source input indicating error location
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceSpan {
    /// Starting byte offset (0-indexed)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl SourceSpan {
    /// Create a span for a single position
    pub fn point(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Format the source with the error position marked
    ///
    /// Returns a string like:
    /// ```text
    /// GEOGCS["WGS 84",DATUM[
    ///                      ^
    /// ```
    pub fn highlight(&self, source: &str) -> String {
        if source.is_empty() {
            return String::new();
        }

        let safe_start = self.start.min(source.len());
        let safe_end = self.end.min(source.len()).max(safe_start);

        let mut pointer = " ".repeat(safe_start);
        pointer.push('^');
        for _ in (safe_start + 1)..safe_end {
            pointer.push('~');
        }

        format!("{}\n{}", source, pointer)
    }
}

/// Main error type for ferro-srs operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SrsError {
    /// WKT parse error with byte position and message
    #[error("WKT parse error at position {pos}: {msg}")]
    Parse { pos: usize, msg: String },

    /// WKT nesting exceeded the parser depth limit
    #[error("WKT nesting exceeds {limit} levels")]
    TooDeep { limit: usize },

    /// A proj4 definition referenced an EPSG code that has no projection definition
    #[error("No projection definition registered for {id}")]
    RegistryLookup { id: String },

    /// A definition being registered could not be parsed
    #[error("Could not parse projection definition for {id}")]
    InvalidDefinition { id: String },

    /// Invalid configuration
    #[error("Invalid configuration: {msg}")]
    Config { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },

    /// TOML parsing error
    #[error("TOML error: {msg}")]
    Toml { msg: String },
}

impl SrsError {
    /// Create a WKT parse error
    pub fn parse(pos: usize, msg: impl Into<String>) -> Self {
        SrsError::Parse {
            pos,
            msg: msg.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            SrsError::Parse { .. } => ErrorCode::InvalidWkt,
            SrsError::TooDeep { .. } => ErrorCode::WktTooDeep,
            SrsError::RegistryLookup { .. } => ErrorCode::RegistryLookup,
            SrsError::InvalidDefinition { .. } => ErrorCode::InvalidDefinition,
            SrsError::Config { .. } => ErrorCode::InvalidConfig,
            SrsError::Io { .. } => ErrorCode::IoError,
            SrsError::Json { .. } => ErrorCode::JsonError,
            SrsError::Toml { .. } => ErrorCode::TomlError,
        }
    }

    /// Get a formatted error, marking the failing position for parse errors
    pub fn detailed_message(&self, source: Option<&str>) -> String {
        let message = format!("[{}] {}", self.code(), self);
        match (self, source) {
            (SrsError::Parse { pos, .. }, Some(source)) => {
                format!("{}\n\n{}", message, SourceSpan::point(*pos).highlight(source))
            }
            _ => message,
        }
    }
}

impl From<std::io::Error> for SrsError {
    fn from(err: std::io::Error) -> Self {
        SrsError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SrsError {
    fn from(err: serde_json::Error) -> Self {
        SrsError::Json {
            msg: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SrsError {
    fn from(err: toml::de::Error) -> Self {
        SrsError::Toml {
            msg: err.to_string(),
        }
    }
}
