use super::ComplexityRules;
use tree_sitter::Node;

/// Cognitive complexity: nesting structures cost `1 + depth` and deepen their
/// children; flat structures (else, ternary, case arms) cost 1
///
/// Children of a nesting node that are themselves flat structures (an `else`
/// hanging off an `if`) stay at the nesting node's own depth.
#[must_use]
pub fn cognitive(node: Node, rules: &ComplexityRules) -> u32 {
    let mut score = 0u32;
    let mut stack = vec![(node, 0u32)];

    while let Some((current, depth)) = stack.pop() {
        let kind = current.kind();
        let nests = rules.nesting_types.contains(&kind);
        let child_depth = if nests {
            score = score.saturating_add(1 + depth);
            depth + 1
        } else {
            if rules.non_nesting_types.contains(&kind) {
                score = score.saturating_add(1);
            }
            depth
        };

        let mut cursor = current.walk();
        for child in current.children(&mut cursor) {
            let flat_branch = nests && rules.non_nesting_types.contains(&child.kind());
            stack.push((child, if flat_branch { depth } else { child_depth }));
        }
    }

    score
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
        cognitive(tree.root_node(), &def.complexity)
    }

    #[test]
    fn test_flat_function_scores_zero() {
        assert_eq!(measure("javascript", "function f(a) { return a; }"), 0);
    }

    #[test]
    fn test_nesting_increments() {
        // if (+1), nested for (+2), nested while (+3)
        let js = "function f(a) {\n  if (a) {\n    for (;;) {\n      while (a) { a--; }\n    }\n  }\n}";
        assert_eq!(measure("javascript", js), 6);
    }

    #[test]
    fn test_else_is_flat() {
        let js = "function f(a) {\n  if (a) {\n    return 1;\n  } else {\n    return 2;\n  }\n}";
        assert_eq!(measure("javascript", js), 2);

        let go = "package main\n\nfunc f(a bool) int {\n\tif a {\n\t\treturn 1\n\t} else {\n\t\treturn 2\n\t}\n}\n";
        assert_eq!(measure("go", go), 2);
    }
}
