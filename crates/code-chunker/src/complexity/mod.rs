//! Complexity metrics over a symbol subtree.
//!
//! All three metrics are driven by a per-language [`ComplexityRules`]
//! vocabulary of node kinds, so the walkers here know nothing about any
//! particular grammar.

mod cognitive;
mod cyclomatic;
mod halstead;

pub use cognitive::cognitive;
pub use cyclomatic::cyclomatic;
pub use halstead::halstead;

use tree_sitter::{Node, TreeCursor};

/// Node-kind vocabularies used by the metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexityRules {
    /// Kinds adding one independent path (branches, loops, case arms,
    /// boolean operator tokens)
    pub decision_points: &'static [&'static str],

    /// Kinds adding `1 + depth` and nesting their children
    pub nesting_types: &'static [&'static str],

    /// Kinds adding a flat 1 without nesting (else, ternary, case arms)
    pub non_nesting_types: &'static [&'static str],

    /// Anonymous tokens counted as operators
    pub operator_symbols: &'static [&'static str],

    /// Keyword tokens counted as operators
    pub operator_keywords: &'static [&'static str],

    /// Kinds counted as a single operand without descending (string literals)
    pub atomic_operand_types: &'static [&'static str],
}

/// Operator tokens shared by the C-family grammars
pub const C_FAMILY_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "+", "-", "*", "/", "%",
    "++", "--", "==", "!=", "<", ">", "<=", ">=", "&&", "||", "!", "&", "|", "^", "~", "<<", ">>",
    "?", ":", ".", ",", ";", "(", "[", "{", "=>",
];

/// Visit the subtree rooted at `node` in preorder; children of a node are
/// skipped when `visit` returns `false`
pub(crate) fn walk_preorder(node: Node, mut visit: impl FnMut(Node) -> bool) {
    let mut cursor = node.walk();
    loop {
        if visit(cursor.node()) && cursor.goto_first_child() {
            continue;
        }
        if !advance(&mut cursor) {
            return;
        }
    }
}

/// Move to the next sibling, climbing as needed; `false` once back at the root
fn advance(cursor: &mut TreeCursor) -> bool {
    loop {
        if cursor.goto_next_sibling() {
            return true;
        }
        if !cursor.goto_parent() {
            return false;
        }
    }
}
