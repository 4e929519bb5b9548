//! Shared symbol-boundary driver.
//!
//! Each node is classified by the language's [`LanguageTraverser`] in a fixed
//! order: target, container, declaration, pass-through. Anything else is left
//! as ordinary text for the surrounding template chunk.
//!
//! [`LanguageTraverser`]: crate::languages::LanguageTraverser

use crate::complexity;
use crate::languages::LanguageDefinition;
use crate::symbols;
use crate::types::SymbolInfo;
use tree_sitter::Node;

/// Maximum distance between a declaration and the function value it binds
pub const MAX_WRAP_DEPTH: usize = 3;

/// A function value found inside a declaration, with its bound name
#[derive(Debug, Clone)]
pub struct WrappedFunction<'t> {
    pub node: Node<'t>,
    pub name: String,
}

/// A symbol together with the nodes it was derived from
#[derive(Debug, Clone)]
pub(crate) struct SymbolBoundary<'t> {
    /// Node measured for complexity, Halstead metrics and call sites
    pub body: Node<'t>,
    pub symbol: SymbolInfo,
}

/// Search `declaration` for a function value of one of `value_types` that is
/// bound to a name, at most [`MAX_WRAP_DEPTH`] levels down
///
/// Function values passed as arguments (`describe('x', () => {})`) have no
/// binding and are skipped.
#[must_use]
pub fn find_wrapped_function<'t>(
    declaration: Node<'t>,
    source: &str,
    value_types: &[&str],
) -> Option<WrappedFunction<'t>> {
    if value_types.is_empty() {
        return None;
    }

    let mut stack = vec![(declaration, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        if depth > 0 && value_types.contains(&node.kind()) {
            if let Some(name) = binding_name(node, declaration, source) {
                return Some(WrappedFunction { node, name });
            }
            continue;
        }

        if depth == MAX_WRAP_DEPTH {
            continue;
        }

        let children = symbols::named_children(node);
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }

    None
}

/// Name bound to `value` by the nearest ancestor up to `declaration`
fn binding_name(value: Node, declaration: Node, source: &str) -> Option<String> {
    let mut current = value.parent();
    while let Some(ancestor) = current {
        for field in ["name", "left", "property"] {
            let Some(target) = ancestor.child_by_field_name(field) else {
                continue;
            };
            if target.id() == value.id() {
                continue;
            }
            if let Some(name) = symbols::simple_name(target, source) {
                return Some(name);
            }
        }

        if ancestor.id() == declaration.id() {
            break;
        }
        current = ancestor.parent();
    }
    None
}

/// Collect symbol boundaries of a tree in source order
///
/// Containers precede their members. Complexity is filled in for every symbol.
pub(crate) fn collect_boundaries<'t>(
    def: &LanguageDefinition,
    root: Node<'t>,
    source: &str,
) -> Vec<SymbolBoundary<'t>> {
    let traverser = def.traverser.as_ref();
    let mut boundaries = Vec::new();
    let mut stack: Vec<(Node<'t>, Option<String>)> = vec![(root, None)];

    while let Some((node, parent)) = stack.pop() {
        let mut members = Vec::new();

        if traverser.is_target(node) {
            if let Some(symbol) = def.symbols.extract_symbol(node, source, parent.as_deref()) {
                boundaries.push(measure(def, node, symbol));
            }
            if traverser.is_container(node) {
                push_members(traverser, node, source, parent.as_deref(), &mut members);
            }
        } else if traverser.is_container(node) {
            push_members(traverser, node, source, parent.as_deref(), &mut members);
        } else if let Some(wrapped) = traverser
            .is_declaration(node)
            .then(|| traverser.find_wrapped_function(node, source))
            .flatten()
        {
            let symbol = wrapped_symbol(node, &wrapped, source, parent.as_deref());
            boundaries.push(measure(def, wrapped.node, symbol));
        } else if traverser.is_pass_through(node) {
            members.extend(
                symbols::named_children(node)
                    .into_iter()
                    .map(|child| (child, parent.clone())),
            );
        }

        stack.extend(members.into_iter().rev());
    }

    boundaries
}

fn push_members<'t>(
    traverser: &dyn crate::languages::LanguageTraverser,
    container: Node<'t>,
    source: &str,
    outer: Option<&str>,
    members: &mut Vec<(Node<'t>, Option<String>)>,
) {
    let Some(body) = traverser.container_body(container) else {
        return;
    };
    let name = traverser
        .container_name(container, source)
        .or_else(|| outer.map(str::to_string));
    members.extend(
        symbols::named_children(body)
            .into_iter()
            .map(|child| (child, name.clone())),
    );
}

/// Symbol for a declaration-bound function: lines from the declaration,
/// shape from the function value
fn wrapped_symbol(
    declaration: Node,
    wrapped: &WrappedFunction,
    source: &str,
    parent_class: Option<&str>,
) -> SymbolInfo {
    let (start_line, end_line) = symbols::line_range(declaration);
    let parameters = match wrapped.node.child_by_field_name("parameters") {
        Some(_) => symbols::parameters(wrapped.node, "parameters", source),
        None => symbols::parameters(wrapped.node, "parameter", source),
    };
    SymbolInfo {
        name: wrapped.name.clone(),
        kind: symbols::function_kind(parent_class),
        start_line,
        end_line,
        parent_class: parent_class.map(str::to_string),
        signature: symbols::signature(declaration, wrapped.node, source),
        parameters,
        return_type: symbols::return_type(wrapped.node, &["return_type", "result"], source),
        complexity: 1,
        cognitive_complexity: 0,
    }
}

fn measure<'t>(def: &LanguageDefinition, body: Node<'t>, mut symbol: SymbolInfo) -> SymbolBoundary<'t> {
    symbol.complexity = complexity::cyclomatic(body, &def.complexity);
    symbol.cognitive_complexity = complexity::cognitive(body, &def.complexity);
    SymbolBoundary { body, symbol }
}

/// Every symbol of a parsed file, in source order, with complexity filled in
#[must_use]
pub fn extract_symbols(def: &LanguageDefinition, root: Node, source: &str) -> Vec<SymbolInfo> {
    collect_boundaries(def, root, source)
        .into_iter()
        .map(|boundary| boundary.symbol)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::get_language;
    use crate::types::SymbolKind;
    use pretty_assertions::assert_eq;
    use tree_sitter::{Parser, Tree};

    fn parse(tag: &str, source: &str) -> (&'static LanguageDefinition, Tree) {
        let def = get_language(tag).unwrap();
        let mut parser = Parser::new();
        parser.set_language(def.grammar()).unwrap();
        (def, parser.parse(source, None).unwrap())
    }

    fn names(tag: &str, source: &str) -> Vec<(String, SymbolKind, Option<String>)> {
        let (def, tree) = parse(tag, source);
        extract_symbols(def, tree.root_node(), source)
            .into_iter()
            .map(|s| (s.name, s.kind, s.parent_class))
            .collect()
    }

    #[test]
    fn test_wrapped_arrow_function_takes_binding_name() {
        let source = "const add = (a, b) => a + b;\n";
        let (def, tree) = parse("javascript", source);
        let symbols = extract_symbols(def, tree.root_node(), source);

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "add");
        assert_eq!(symbols[0].kind, SymbolKind::Function);
        assert_eq!(symbols[0].parameters, vec!["a".to_string(), "b".to_string()]);
        assert_eq!((symbols[0].start_line, symbols[0].end_line), (1, 1));
    }

    #[test]
    fn test_unbound_callbacks_are_not_symbols() {
        let source = "describe('suite', () => {\n  it('works', () => {});\n});\n";
        assert!(names("javascript", source).is_empty());
    }

    #[test]
    fn test_deeply_wrapped_function_is_out_of_reach() {
        let source = "const handler = wrap(retry(function () { return 1; }));\n";
        assert!(names("javascript", source).is_empty());
    }

    #[test]
    fn test_class_members_get_parent_class() {
        let source = "class Greeter {\n  greet() { return 'hi'; }\n  static create() { return new Greeter(); }\n}\n";
        assert_eq!(
            names("javascript", source),
            vec![
                ("Greeter".to_string(), SymbolKind::Class, None),
                ("greet".to_string(), SymbolKind::Method, Some("Greeter".to_string())),
                ("create".to_string(), SymbolKind::Method, Some("Greeter".to_string())),
            ]
        );
    }

    #[test]
    fn test_rust_impl_is_container_only() {
        let source = "struct Point;\n\nimpl Point {\n    fn origin() -> Self { Point }\n}\n";
        assert_eq!(
            names("rust", source),
            vec![
                ("Point".to_string(), SymbolKind::Class, None),
                ("origin".to_string(), SymbolKind::Method, Some("Point".to_string())),
            ]
        );
    }

    #[test]
    fn test_python_decorated_and_nested_definitions() {
        let source = "@cache\ndef load():\n    def inner():\n        pass\n    return inner\n";
        assert_eq!(
            names("python", source),
            vec![("load".to_string(), SymbolKind::Function, None)]
        );
    }

    #[test]
    fn test_complexity_is_filled_in() {
        let source = "function pick(a) {\n  if (a) { return 1; }\n  return a ? 2 : 3;\n}\n";
        let (def, tree) = parse("javascript", source);
        let symbols = extract_symbols(def, tree.root_node(), source);

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].complexity, 3);
        assert!(symbols[0].cognitive_complexity >= 2);
    }
}
