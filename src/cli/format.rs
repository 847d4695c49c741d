//! Output formatting utilities for CLI operations

use crate::equivalence::EquivalenceResult;
use crate::error::SrsError;
use crate::srs::Srs;
use std::io::{self, Write};
use std::str::FromStr;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text format (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    /// Parse an output format from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use ferro_srs::cli::OutputFormat;
    /// use std::str::FromStr;
    ///
    /// assert!(matches!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json));
    /// assert!(matches!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        })
    }
}

/// Write an identified descriptor.
///
/// Text output is one `key: value` line per present field; JSON output is the
/// serialized descriptor wrapped with the input.
///
/// # Examples
///
/// ```
/// use ferro_srs::cli::{output_descriptor, OutputFormat};
/// use ferro_srs::srs;
/// use std::io::Cursor;
///
/// let wgs84 = srs(4326).unwrap();
/// let mut buffer = Cursor::new(Vec::new());
/// output_descriptor(&mut buffer, "4326", &wgs84, OutputFormat::Text).unwrap();
/// let result = String::from_utf8(buffer.into_inner()).unwrap();
/// assert!(result.contains("id: EPSG:4326"));
/// ```
pub fn output_descriptor<W: Write>(
    writer: &mut W,
    input: &str,
    srs: &Srs,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "input": input,
                "srs": srs,
                "status": "ok",
            });
            writeln!(writer, "{}", value)
        }
        OutputFormat::Text => {
            writeln!(writer, "{} -> {}", input, srs)?;
            if let Some(code) = srs.code() {
                writeln!(writer, "  code: {}", code)?;
            }
            if let Some(id) = srs.id() {
                writeln!(writer, "  id: {}", id)?;
            }
            if let Some(proj4) = srs.proj4() {
                writeln!(writer, "  proj4: {}", proj4)?;
            }
            if let Some(ogc) = srs.wkt_ogc() {
                writeln!(writer, "  wkt.ogc: {}", ogc)?;
            }
            if let Some(esri) = srs.wkt_esri() {
                writeln!(writer, "  wkt.esri: {}", esri)?;
            }
            if let Some(params) = srs.params() {
                writeln!(writer, "  params: {}", params.comparison_string())?;
            }
            Ok(())
        }
    }
}

/// Write the outcome of an equivalence check.
///
/// # Examples
///
/// ```
/// use ferro_srs::cli::{output_equivalence, OutputFormat};
/// use ferro_srs::equivalence::{EquivalenceLevel, EquivalenceResult};
/// use std::io::Cursor;
///
/// let result = EquivalenceResult::new(EquivalenceLevel::Code);
/// let mut buffer = Cursor::new(Vec::new());
/// output_equivalence(&mut buffer, "4326", "EPSG:4326", &result, OutputFormat::Text).unwrap();
/// let out = String::from_utf8(buffer.into_inner()).unwrap();
/// assert_eq!(out, "4326 == EPSG:4326 (Same EPSG code)\n");
/// ```
pub fn output_equivalence<W: Write>(
    writer: &mut W,
    a: &str,
    b: &str,
    result: &EquivalenceResult,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "a": a,
                "b": b,
                "equivalent": result.is_equivalent(),
                "level": result.level.description(),
                "notes": result.notes,
            });
            writeln!(writer, "{}", value)
        }
        OutputFormat::Text => {
            let op = if result.is_equivalent() { "==" } else { "!=" };
            writeln!(writer, "{} {} {} ({})", a, op, b, result.level)?;
            for note in &result.notes {
                writeln!(writer, "  {}", note)?;
            }
            Ok(())
        }
    }
}

/// Write a plain text result, such as a canonicalized WKT string.
pub fn output_text<W: Write>(
    writer: &mut W,
    input: &str,
    output: &str,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "input": input,
                "output": output,
                "status": "ok",
            });
            writeln!(writer, "{}", value)
        }
        OutputFormat::Text => writeln!(writer, "{}", output),
    }
}

/// Write an error to the output
///
/// # Examples
///
/// ```
/// use ferro_srs::cli::{output_error, OutputFormat};
/// use ferro_srs::SrsError;
/// use std::io::Cursor;
///
/// let mut buffer = Cursor::new(Vec::new());
/// let error = SrsError::RegistryLookup { id: "EPSG:99999".to_string() };
/// output_error(&mut buffer, "input", &error, OutputFormat::Text).unwrap();
/// let result = String::from_utf8(buffer.into_inner()).unwrap();
/// assert!(result.contains("ERROR: input"));
/// ```
pub fn output_error<W: Write>(
    writer: &mut W,
    input: &str,
    error: &SrsError,
    format: OutputFormat,
) -> io::Result<()> {
    output_error_with_context(writer, input, error, format, None)
}

/// Write an error to the output with optional line number context
pub fn output_error_with_context<W: Write>(
    writer: &mut W,
    input: &str,
    error: &SrsError,
    format: OutputFormat,
    line_number: Option<usize>,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::json!({
                "input": input,
                "error": error.to_string(),
                "code": error.code().as_str(),
                "status": "error",
            });
            if let Some(line) = line_number {
                value["line"] = serde_json::json!(line);
            }
            writeln!(writer, "{}", value)
        }
        OutputFormat::Text => {
            if let Some(line) = line_number {
                writeln!(writer, "ERROR (line {}): {} - {}", line, input, error)
            } else {
                writeln!(writer, "ERROR: {} - {}", input, error)
            }
        }
    }
}
