//! CLI utilities for ferro-srs
//!
//! Pure and writer-based helpers used by the `ferro-srs` binary, kept in the
//! library so they can be unit tested.

pub mod format;

// Re-export commonly used items
pub use format::{
    output_descriptor, output_equivalence, output_error, output_error_with_context, output_text,
    OutputFormat,
};

/// UTF-8 BOM (Byte Order Mark) constant
const UTF8_BOM: &str = "\u{feff}";

/// Strip UTF-8 BOM from the beginning of a string if present.
///
/// # Examples
///
/// ```
/// use ferro_srs::cli::strip_bom;
///
/// assert_eq!(strip_bom("\u{feff}EPSG:4326"), "EPSG:4326");
/// assert_eq!(strip_bom("EPSG:4326"), "EPSG:4326");
/// ```
pub fn strip_bom(s: &str) -> &str {
    s.strip_prefix(UTF8_BOM).unwrap_or(s)
}

/// Process an input line: trim whitespace, strip the BOM on the first line,
/// and skip blank lines and `#` comment lines.
///
/// Inline `#` is kept since it is not a comment marker inside WKT or proj4.
///
/// # Examples
///
/// ```
/// use ferro_srs::cli::process_input_line;
///
/// assert_eq!(process_input_line("  EPSG:4326 ", false), Some("EPSG:4326"));
/// assert_eq!(process_input_line("\u{feff}4326", true), Some("4326"));
/// assert_eq!(process_input_line("", false), None);
/// assert_eq!(process_input_line("# comment", false), None);
/// ```
pub fn process_input_line(line: &str, is_first_line: bool) -> Option<&str> {
    let line = if is_first_line { strip_bom(line) } else { line };
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        None
    } else {
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}test"), "test");
        assert_eq!(strip_bom("test"), "test");
        assert_eq!(strip_bom("\u{feff}"), "");
        assert_eq!(strip_bom(""), "");
    }

    #[test]
    fn test_process_input_line() {
        assert_eq!(process_input_line("4326", false), Some("4326"));
        assert_eq!(
            process_input_line("+proj=longlat +datum=WGS84", false),
            Some("+proj=longlat +datum=WGS84")
        );

        // BOM handling on first line only
        assert_eq!(process_input_line("\u{feff}4326", true), Some("4326"));
        assert_eq!(
            process_input_line("\u{feff}4326", false),
            Some("\u{feff}4326")
        );

        assert_eq!(process_input_line("", false), None);
        assert_eq!(process_input_line("   ", false), None);
        assert_eq!(process_input_line("# comment", false), None);
    }

    #[test]
    fn test_inline_hash_is_kept() {
        assert_eq!(
            process_input_line(r#"LOCAL_CS["a#b"]"#, false),
            Some(r#"LOCAL_CS["a#b"]"#)
        );
    }
}
