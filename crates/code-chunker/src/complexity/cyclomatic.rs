use super::{walk_preorder, ComplexityRules};
use tree_sitter::Node;

/// Cyclomatic complexity: 1 plus one per decision point in the subtree
#[must_use]
pub fn cyclomatic(node: Node, rules: &ComplexityRules) -> u32 {
    let mut complexity = 1u32;
    walk_preorder(node, |current| {
        if rules.decision_points.contains(&current.kind()) {
            complexity = complexity.saturating_add(1);
        }
        true
    });
    complexity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::get_language;
    use pretty_assertions::assert_eq;

    fn measure(tag: &str, source: &str) -> u32 {
        let def = get_language(tag).unwrap();
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(def.grammar()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        cyclomatic(tree.root_node(), &def.complexity)
    }

    #[test]
    fn test_straight_line_code_is_one() {
        assert_eq!(measure("javascript", "function f(a) { return a + 1; }"), 1);
        assert_eq!(measure("rust", "fn f() -> i32 { 1 }"), 1);
    }

    #[test]
    fn test_branches_loops_and_boolean_operators() {
        let js = "function f(a, b) {\n  if (a && b) { return 1; }\n  for (;;) { break; }\n  return a || b ? 1 : 0;\n}";
        // if, &&, for, ||, ternary
        assert_eq!(measure("javascript", js), 6);

        let py = "def f(a, b):\n    if a and b:\n        return 1\n    while a:\n        a -= 1\n    return 0\n";
        assert_eq!(measure("python", py), 4);
    }

    #[test]
    fn test_match_arms_count() {
        let rust = "fn f(x: u8) -> u8 {\n    match x {\n        0 => 1,\n        1 => 2,\n        _ => 3,\n    }\n}";
        assert_eq!(measure("rust", rust), 4);
    }
}
