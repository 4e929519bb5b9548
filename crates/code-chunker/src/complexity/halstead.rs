use super::{walk_preorder, ComplexityRules};
use crate::symbols::node_text;
use crate::types::HalsteadMetrics;
use std::collections::HashMap;
use tree_sitter::Node;

/// Halstead metrics over the leaf tokens of a subtree
///
/// Anonymous tokens listed as operator symbols or keywords are operators,
/// named leaves are operands keyed by their text, and atomic operand kinds
/// (string literals) count as one operand each. Comments are ignored. With
/// no operands every derived metric is zero.
#[must_use]
pub fn halstead(node: Node, source: &str, rules: &ComplexityRules) -> HalsteadMetrics {
    let mut operators: HashMap<&str, usize> = HashMap::new();
    let mut operands: HashMap<&str, usize> = HashMap::new();

    walk_preorder(node, |current| {
        let kind = current.kind();
        if kind.contains("comment") {
            return false;
        }

        if rules.atomic_operand_types.contains(&kind) {
            *operands.entry(node_text(current, source)).or_default() += 1;
            return false;
        }

        if current.child_count() > 0 {
            return true;
        }

        if current.is_named() {
            *operands.entry(node_text(current, source)).or_default() += 1;
        } else if rules.operator_symbols.contains(&kind) || rules.operator_keywords.contains(&kind)
        {
            *operators.entry(kind).or_default() += 1;
        }
        false
    });

    metrics(
        operators.len(),
        operands.len(),
        operators.values().sum(),
        operands.values().sum(),
    )
}

fn metrics(n1: usize, n2: usize, total_operators: usize, total_operands: usize) -> HalsteadMetrics {
    let mut result = HalsteadMetrics {
        distinct_operators: n1,
        distinct_operands: n2,
        total_operators,
        total_operands,
        ..HalsteadMetrics::default()
    };
    if n2 == 0 {
        return result;
    }

    let vocabulary = (n1 + n2) as f64;
    let length = (total_operators + total_operands) as f64;
    result.volume = length * vocabulary.log2();
    result.difficulty = (n1 as f64 / 2.0) * (total_operands as f64 / n2 as f64);
    result.effort = result.difficulty * result.volume;
    result.bugs = result.volume / 3000.0;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::get_language;
    use pretty_assertions::assert_eq;

    fn measure(tag: &str, source: &str) -> HalsteadMetrics {
        let def = get_language(tag).unwrap();
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(def.grammar()).unwrap();
        let tree = parser.parse(source, None).unwrap();
        halstead(tree.root_node(), source, &def.complexity)
    }

    #[test]
    fn test_zero_operands_yields_zero_metrics() {
        let result = metrics(4, 0, 9, 0);
        assert_eq!(result.volume, 0.0);
        assert_eq!(result.difficulty, 0.0);
        assert_eq!(result.effort, 0.0);
        assert_eq!(result.bugs, 0.0);
        assert!(!result.volume.is_nan());
    }

    #[test]
    fn test_formulas() {
        // n1 = 2, n2 = 2, N1 = 3, N2 = 4
        let result = metrics(2, 2, 3, 4);
        assert!((result.volume - 14.0).abs() < 1e-9);
        assert!((result.difficulty - 2.0).abs() < 1e-9);
        assert!((result.effort - 28.0).abs() < 1e-9);
        assert!((result.bugs - 14.0 / 3000.0).abs() < 1e-12);
    }

    #[test]
    fn test_counts_distinct_operands_by_text() {
        let result = measure("javascript", "x = x + 1;");
        // operands: x, x, 1 / operators: =, +, ;
        assert_eq!(result.distinct_operands, 2);
        assert_eq!(result.total_operands, 3);
        assert_eq!(result.distinct_operators, 3);
        assert!(result.volume > 0.0);
    }

    #[test]
    fn test_string_literal_is_one_operand() {
        let result = measure("python", "print('a b c')\n");
        assert_eq!(result.total_operands, 2);
    }

    #[test]
    fn test_comments_are_ignored() {
        let with_comment = measure("rust", "// note\nfn f() {}\n");
        let without = measure("rust", "fn f() {}\n");
        assert_eq!(with_comment, without);
    }
}
