//! Outgoing call references of a symbol body.

use crate::languages::all_call_expression_types;
use crate::symbols;
use crate::types::CallSite;
use std::collections::HashSet;
use tree_sitter::Node;

/// Calls inside `node` whose kind is one of `call_types`, deduplicated by
/// `(symbol, line)` in source order
#[must_use]
pub fn extract_call_sites(node: Node, source: &str, call_types: &[&str]) -> Vec<CallSite> {
    collect(node, source, |kind| call_types.contains(&kind))
}

/// Like [`extract_call_sites`] with the call kinds of every registered language
#[must_use]
pub fn extract_call_sites_any(node: Node, source: &str) -> Vec<CallSite> {
    let call_types = all_call_expression_types();
    collect(node, source, |kind| call_types.contains(kind))
}

fn collect(node: Node, source: &str, is_call: impl Fn(&str) -> bool) -> Vec<CallSite> {
    let mut seen = HashSet::new();
    let mut calls = Vec::new();
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        if is_call(current.kind()) {
            if let Some(name) = callee(current).and_then(symbols::name_node) {
                let symbol = symbols::node_text(name, source).trim().to_string();
                let line = name.start_position().row + 1;
                if !symbol.is_empty() && seen.insert((symbol.clone(), line)) {
                    calls.push(CallSite { symbol, line });
                }
            }
        }

        let children = symbols::named_children(current);
        stack.extend(children.into_iter().rev());
    }

    calls
}

/// Node naming the called function, type or macro
fn callee(call: Node) -> Option<Node> {
    match call.kind() {
        "macro_invocation" => call.child_by_field_name("macro"),
        "new_expression" => call.child_by_field_name("constructor"),
        "object_creation_expression" => call
            .child_by_field_name("type")
            .or_else(|| {
                symbols::named_children(call)
                    .into_iter()
                    .find(|child| matches!(child.kind(), "name" | "qualified_name"))
            }),
        "method_invocation"
        | "member_call_expression"
        | "nullsafe_member_call_expression"
        | "scoped_call_expression" => call.child_by_field_name("name"),
        _ => call.child_by_field_name("function"),
    }
}
