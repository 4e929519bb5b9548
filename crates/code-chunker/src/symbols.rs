//! Node-level helpers shared by the per-language extractors.

use crate::types::{push_unique, SymbolInfo, SymbolKind};
use tree_sitter::Node;
use unicode_segmentation::UnicodeSegmentation;

/// Signatures are cut to this many characters
pub const MAX_SIGNATURE_CHARS: usize = 200;

/// Name used for function values without a binding
pub const ANONYMOUS: &str = "anonymous";

const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "private_property_identifier",
    "shorthand_property_identifier",
    "field_identifier",
    "type_identifier",
    "package_identifier",
    "name",
    "constant",
    "self",
];

/// Source text of a node
#[must_use]
pub fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Text of a field child, if present and non-empty
#[must_use]
pub fn field_text(node: Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| node_text(child, source).trim().to_string())
        .filter(|text| !text.is_empty())
}

/// 1-indexed inclusive line range of a node
#[must_use]
pub fn line_range(node: Node) -> (usize, usize) {
    let start = node.start_position();
    let end = node.end_position();
    let end_line = if end.column == 0 && end.row > start.row {
        end.row
    } else {
        end.row + 1
    };
    (start.row + 1, end_line)
}

/// Resolve a node to a flat identifier: plain identifiers, or the rightmost
/// name of member/attribute/scoped access
#[must_use]
pub fn simple_name(node: Node, source: &str) -> Option<String> {
    let name = name_node(node)?;
    let text = node_text(name, source).trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Identifier node that [`simple_name`] reads
#[must_use]
pub fn name_node(node: Node) -> Option<Node> {
    let mut current = node;
    for _ in 0..8 {
        if IDENTIFIER_KINDS.contains(&current.kind()) {
            return Some(current);
        }

        let next = match current.kind() {
            "member_expression" => current.child_by_field_name("property"),
            "attribute" => current.child_by_field_name("attribute"),
            "field_expression" | "selector_expression" => current.child_by_field_name("field"),
            "scoped_identifier"
            | "scoped_type_identifier"
            | "member_access_expression"
            | "qualified_name"
            | "generic_name" => current
                .child_by_field_name("name")
                .or_else(|| last_named_child(current)),
            "generic_type" | "generic_function" => current
                .child_by_field_name("type")
                .or_else(|| current.child_by_field_name("function"))
                .or_else(|| current.named_child(0)),
            "variable_name" | "parenthesized_expression" => current.named_child(0),
            "pointer_type" | "reference_type" => current
                .child_by_field_name("type")
                .or_else(|| last_named_child(current)),
            _ => None,
        };

        current = next?;
    }
    None
}

fn last_named_child(node: Node) -> Option<Node> {
    node.named_child(node.named_child_count().checked_sub(1)?)
}

/// Name of a declaration from its `name` field
#[must_use]
pub fn declared_name(node: Node, source: &str) -> Option<String> {
    node.child_by_field_name("name")
        .and_then(|name| simple_name(name, source))
}

/// Collapse whitespace runs and cut to [`MAX_SIGNATURE_CHARS`] on a grapheme boundary
#[must_use]
pub fn normalize_signature(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_SIGNATURE_CHARS {
        return collapsed;
    }

    let mut out = String::new();
    let mut count = 0;
    for grapheme in collapsed.graphemes(true) {
        let len = grapheme.chars().count();
        if count + len > MAX_SIGNATURE_CHARS {
            break;
        }
        out.push_str(grapheme);
        count += len;
    }
    out
}

/// Declaration header: text from `start` up to the body of `owner`
///
/// Without a body the first line of `start` is used.
#[must_use]
pub fn signature(start: Node, owner: Node, source: &str) -> String {
    let from = start.start_byte();
    let raw = match owner.child_by_field_name("body") {
        Some(body) if body.start_byte() > from => &source[from..body.start_byte()],
        _ => node_text(start, source).lines().next().unwrap_or(""),
    };
    let trimmed = raw.trim_end().trim_end_matches(['{', ':']).trim_end();
    normalize_signature(trimmed)
}

/// Texts of the named children of `node.<field>`, comments excluded
#[must_use]
pub fn parameters(node: Node, field: &str, source: &str) -> Vec<String> {
    let Some(list) = node.child_by_field_name(field) else {
        return Vec::new();
    };

    // Arrow functions with a bare identifier parameter
    if IDENTIFIER_KINDS.contains(&list.kind()) {
        return vec![node_text(list, source).to_string()];
    }

    let mut cursor = list.walk();
    let params = list
        .named_children(&mut cursor)
        .filter(|child| !child.kind().contains("comment"))
        .map(|child| normalize_signature(node_text(child, source)))
        .filter(|text| !text.is_empty())
        .collect();
    params
}

/// First present field among `fields`, with the leading `:`/`->` stripped
#[must_use]
pub fn return_type(node: Node, fields: &[&str], source: &str) -> Option<String> {
    fields
        .iter()
        .find_map(|field| field_text(node, field, source))
        .map(|text| {
            text.trim_start_matches("->")
                .trim_start_matches(':')
                .trim()
                .to_string()
        })
        .filter(|text| !text.is_empty())
}

/// Symbol with range, signature, parameters and return type read from the
/// node's conventional fields; complexity is filled in by the traversal
#[must_use]
pub fn symbol_from_node(
    node: Node,
    source: &str,
    name: String,
    kind: SymbolKind,
    parent_class: Option<&str>,
) -> SymbolInfo {
    let (start_line, end_line) = line_range(node);
    SymbolInfo {
        name,
        kind,
        start_line,
        end_line,
        parent_class: parent_class.map(str::to_string),
        signature: signature(node, node, source),
        parameters: parameters(node, "parameters", source),
        return_type: return_type(node, &["return_type"], source),
        complexity: 1,
        cognitive_complexity: 0,
    }
}

/// `Method` inside a container, `Function` otherwise
#[must_use]
pub const fn function_kind(parent_class: Option<&str>) -> SymbolKind {
    if parent_class.is_some() {
        SymbolKind::Method
    } else {
        SymbolKind::Function
    }
}

/// Whether a declaration carries a modifier word (`public`, `static`, ...)
#[must_use]
pub fn has_modifier(node: Node, source: &str, word: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| match child.kind() {
        "modifiers" | "modifier" => node_text(child, source)
            .split_whitespace()
            .any(|token| token == word),
        kind => kind == word,
    });
    found
}

/// Named children of `node` in source order
pub fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    let children = node.named_children(&mut cursor).collect();
    children
}

/// Append `name` to `exports` unless present
pub(crate) fn export(exports: &mut Vec<String>, name: Option<String>) {
    if let Some(name) = name {
        push_unique(exports, name);
    }
}

/// Strip matching quotes from a string literal
#[must_use]
pub fn unquote(text: &str) -> String {
    text.trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_signature_collapses_and_truncates() {
        assert_eq!(normalize_signature("fn  a(\n    x: i32,\n)"), "fn a( x: i32, )");

        let long = format!("fn {}()", "x".repeat(400));
        let normalized = normalize_signature(&long);
        assert_eq!(normalized.chars().count(), MAX_SIGNATURE_CHARS);
    }

    #[test]
    fn test_truncation_keeps_graphemes_whole() {
        let raw = format!("{}e\u{301}tail", "a".repeat(MAX_SIGNATURE_CHARS - 1));
        let normalized = normalize_signature(&raw);
        assert!(normalized.chars().count() <= MAX_SIGNATURE_CHARS);
        assert!(!normalized.ends_with('e'));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'./a'"), "./a");
        assert_eq!(unquote("\"fmt\""), "fmt");
        assert_eq!(unquote("`x`"), "x");
    }
}
