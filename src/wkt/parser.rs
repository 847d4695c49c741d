//! WKT parsing
//!
//! Grammar:
//!
//! ```text
//! node    := keyword ws open ws [ arg (ws "," ws arg)* ] ws close
//! arg     := node | quoted | number | word
//! open    := "[" | "("
//! close   := "]" | ")"
//! quoted  := '"' ( [^"] | '""' )* '"'
//! ```

use super::{WktNode, WktValue};
use crate::error::SrsError;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{opt, recognize},
    number::complete::recognize_float,
    sequence::pair,
    IResult, Parser,
};

/// Maximum node nesting accepted by [`parse_wkt`].
pub const MAX_WKT_DEPTH: usize = 64;

/// Parse WKT text into a node tree.
///
/// Leading and trailing whitespace is ignored; anything else left over after
/// the root node is an error.
pub fn parse_wkt(input: &str) -> Result<WktNode, SrsError> {
    let trimmed = input.trim();
    let offset = input.len() - input.trim_start().len();

    match parse_node(trimmed, 0) {
        Ok((rest, node)) => {
            if rest.trim().is_empty() {
                Ok(node)
            } else {
                Err(SrsError::parse(
                    offset + trimmed.len() - rest.trim_start().len(),
                    "unexpected trailing characters",
                ))
            }
        }
        Err(nom::Err::Failure(err)) if err.code == nom::error::ErrorKind::TooLarge => {
            Err(SrsError::TooDeep {
                limit: MAX_WKT_DEPTH,
            })
        }
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => Err(SrsError::parse(
            offset + trimmed.len() - err.input.len(),
            format!("unexpected input ({:?})", err.code),
        )),
        Err(nom::Err::Incomplete(_)) => {
            Err(SrsError::parse(input.len(), "unexpected end of input"))
        }
    }
}

fn is_keyword_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_keyword_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn keyword(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(is_keyword_start),
        take_while(is_keyword_char),
    ))
    .parse(input)
}

/// Parse a quoted string, resolving doubled quotes.
fn quoted(input: &str) -> IResult<&str, String> {
    let (mut rest, _) = char('"').parse(input)?;
    let mut out = String::new();

    loop {
        match rest.find('"') {
            Some(pos) => {
                out.push_str(&rest[..pos]);
                let after = &rest[pos + 1..];
                if let Some(stripped) = after.strip_prefix('"') {
                    out.push('"');
                    rest = stripped;
                } else {
                    return Ok((after, out));
                }
            }
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    rest,
                    nom::error::ErrorKind::Char,
                )))
            }
        }
    }
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize_float(input)
}

fn open_bracket(input: &str) -> IResult<&str, char> {
    alt((char('['), char('('))).parse(input)
}

fn close_bracket(input: &str) -> IResult<&str, char> {
    alt((char(']'), char(')'))).parse(input)
}

fn parse_arg(input: &str, depth: usize) -> IResult<&str, WktValue> {
    if input.starts_with('"') {
        let (rest, text) = quoted(input)?;
        return Ok((rest, WktValue::Text(text)));
    }

    if input.starts_with(is_keyword_start) {
        let (after_word, word) = keyword(input)?;
        let (probe, _) = multispace0(after_word)?;
        if open_bracket(probe).is_ok() {
            let (rest, node) = parse_node(input, depth + 1)?;
            return Ok((rest, WktValue::Node(node)));
        }
        return Ok((after_word, WktValue::Keyword(word.to_string())));
    }

    let (rest, raw) = number(input)?;
    Ok((rest, WktValue::Number(raw.to_string())))
}

fn parse_node(input: &str, depth: usize) -> IResult<&str, WktNode> {
    if depth >= MAX_WKT_DEPTH {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TooLarge,
        )));
    }

    let (input, name) = keyword(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = open_bracket(input)?;
    let (input, _) = multispace0(input)?;

    let mut args = Vec::new();
    let mut rest = input;

    if let Ok((after, _)) = close_bracket(rest) {
        return Ok((after, WktNode::new(name, args)));
    }

    loop {
        let (after_arg, arg) = parse_arg(rest, depth)?;
        args.push(arg);
        let (after_ws, _) = multispace0(after_arg)?;
        let (after_sep, comma) = opt(tag(",")).parse(after_ws)?;
        if comma.is_some() {
            let (next, _) = multispace0(after_sep)?;
            rest = next;
            continue;
        }
        let (after_close, _) = close_bracket(after_sep)?;
        return Ok((after_close, WktNode::new(name, args)));
    }
}
