//! WKT canonical form
//!
//! The canonical form uppercases keywords, uses square brackets, keeps scalar
//! arguments in their original order, and sorts child nodes by their own
//! canonical text. Two texts that differ only in child ordering, bracket style,
//! keyword case or whitespace produce the same canonical string.

use super::{parse_wkt, WktNode, WktValue};

/// Canonicalize WKT text, or `None` if it does not parse.
pub fn canonicalize(text: &str) -> Option<String> {
    parse_wkt(text)
        .ok()
        .map(|node| canonicalize_node(&node).to_string())
}

/// Canonicalize a parsed node tree.
pub fn canonicalize_node(node: &WktNode) -> WktNode {
    let mut scalars = Vec::new();
    let mut children: Vec<(String, WktNode)> = Vec::new();

    for arg in &node.args {
        match arg {
            WktValue::Node(child) => {
                let canonical = canonicalize_node(child);
                children.push((canonical.to_string(), canonical));
            }
            WktValue::Keyword(word) => scalars.push(WktValue::Keyword(word.to_ascii_uppercase())),
            other => scalars.push(other.clone()),
        }
    }

    children.sort_by(|a, b| a.0.cmp(&b.0));

    let mut args = scalars;
    args.extend(children.into_iter().map(|(_, child)| WktValue::Node(child)));
    WktNode::new(node.keyword.to_ascii_uppercase(), args)
}
