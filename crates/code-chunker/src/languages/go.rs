use super::{
    ExportExtractor, ImportExtractor, LanguageDefinition, LanguageTraverser, SymbolExtractor,
};
use crate::complexity::ComplexityRules;
use crate::symbols::{self, named_children, node_text, unquote};
use crate::types::{ImportEntry, SymbolInfo, SymbolKind};
use tree_sitter::Node;

const RULES: ComplexityRules = ComplexityRules {
    decision_points: &[
        "if_statement",
        "for_statement",
        "expression_case",
        "type_case",
        "communication_case",
        "&&",
        "||",
    ],
    nesting_types: &[
        "if_statement",
        "for_statement",
        "expression_switch_statement",
        "type_switch_statement",
        "select_statement",
    ],
    non_nesting_types: &["else", "expression_case", "type_case", "communication_case"],
    operator_symbols: &[
        "=", ":=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "&^=", "+", "-",
        "*", "/", "%", "++", "--", "==", "!=", "<", ">", "<=", ">=", "&&", "||", "!", "&", "|",
        "^", "&^", "<<", ">>", "<-", "...", ".", ",", ";", ":", "(", "[", "{",
    ],
    operator_keywords: &[
        "if", "else", "for", "range", "switch", "case", "default", "select", "go", "defer",
        "return", "break", "continue", "goto", "fallthrough", "func", "type", "struct",
        "interface", "map", "chan", "var", "const",
    ],
    atomic_operand_types: &[
        "interpreted_string_literal",
        "raw_string_literal",
        "rune_literal",
    ],
};

#[derive(Debug, Clone, Copy, Default)]
struct Go;

impl LanguageTraverser for Go {
    fn target_types(&self) -> &'static [&'static str] {
        &["function_declaration", "method_declaration", "type_spec"]
    }

    fn container_types(&self) -> &'static [&'static str] {
        &[]
    }

    fn declaration_types(&self) -> &'static [&'static str] {
        &["var_declaration", "var_spec"]
    }

    fn pass_through_types(&self) -> &'static [&'static str] {
        // grouped `var (...)` specs sit too deep for one bounded search
        &["source_file", "type_declaration", "var_declaration", "var_spec_list"]
    }

    fn function_value_types(&self) -> &'static [&'static str] {
        &["func_literal"]
    }
}

/// Receiver type of a method: `func (s *Server) Run()` → `Server`
fn receiver_type(method: Node, source: &str) -> Option<String> {
    let receiver = method.child_by_field_name("receiver")?;
    named_children(receiver)
        .into_iter()
        .find(|param| param.kind() == "parameter_declaration")
        .and_then(|param| param.child_by_field_name("type"))
        .and_then(|ty| symbols::simple_name(ty, source))
}

fn type_specs(declaration: Node) -> Vec<Node> {
    named_children(declaration)
        .into_iter()
        .filter(|child| matches!(child.kind(), "type_spec" | "type_alias"))
        .collect()
}

impl SymbolExtractor for Go {
    fn extract_symbol(
        &self,
        node: Node,
        source: &str,
        parent_class: Option<&str>,
    ) -> Option<SymbolInfo> {
        match node.kind() {
            "function_declaration" => {
                let name = symbols::declared_name(node, source)?;
                let mut symbol = symbols::symbol_from_node(
                    node,
                    source,
                    name,
                    symbols::function_kind(parent_class),
                    parent_class,
                );
                symbol.return_type = symbols::return_type(node, &["result"], source);
                Some(symbol)
            }
            "method_declaration" => {
                let name = symbols::declared_name(node, source)?;
                let receiver = receiver_type(node, source);
                let mut symbol = symbols::symbol_from_node(
                    node,
                    source,
                    name,
                    SymbolKind::Method,
                    receiver.as_deref().or(parent_class),
                );
                symbol.return_type = symbols::return_type(node, &["result"], source);
                Some(symbol)
            }
            "type_spec" => {
                let kind = match node.child_by_field_name("type")?.kind() {
                    "struct_type" => SymbolKind::Class,
                    "interface_type" => SymbolKind::Interface,
                    _ => return None,
                };
                let name = symbols::declared_name(node, source)?;
                // a lone spec spans its whole `type` declaration
                let owner = node
                    .parent()
                    .filter(|decl| {
                        decl.kind() == "type_declaration" && type_specs(*decl).len() == 1
                    })
                    .unwrap_or(node);
                Some(symbols::symbol_from_node(owner, source, name, kind, parent_class))
            }
            _ => None,
        }
    }
}

impl ImportExtractor for Go {
    fn import_types(&self) -> &'static [&'static str] {
        &["import_declaration"]
    }

    fn process_import_symbols(&self, node: Node, source: &str) -> Vec<ImportEntry> {
        let mut specs = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "import_spec" => specs.push(child),
                "import_spec_list" => specs.extend(
                    named_children(child)
                        .into_iter()
                        .filter(|spec| spec.kind() == "import_spec"),
                ),
                _ => {}
            }
        }

        specs
            .into_iter()
            .filter_map(|spec| {
                let path = unquote(node_text(spec.child_by_field_name("path")?, source));
                // alias, `.` or `_`; otherwise the package name is the last segment
                let binding = symbols::field_text(spec, "name", source).unwrap_or_else(|| {
                    path.rsplit('/').next().unwrap_or(path.as_str()).to_string()
                });
                Some(ImportEntry::new(path, vec![binding]))
            })
            .collect()
    }

    /// Standard-library packages have no dot in their first path segment
    fn is_standard_library(&self, path: &str) -> bool {
        let first = path.split('/').next().unwrap_or(path);
        !first.contains('.')
    }
}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

fn export_if_capitalized(exports: &mut Vec<String>, name: Option<String>) {
    symbols::export(exports, name.filter(|name| is_exported(name)));
}

impl ExportExtractor for Go {
    fn extract_exports(&self, root: Node, source: &str) -> Vec<String> {
        let mut exports = Vec::new();
        for item in named_children(root) {
            match item.kind() {
                "function_declaration" => {
                    export_if_capitalized(&mut exports, symbols::declared_name(item, source));
                }
                "method_declaration" => {
                    if receiver_type(item, source).is_some_and(|ty| is_exported(&ty)) {
                        export_if_capitalized(&mut exports, symbols::declared_name(item, source));
                    }
                }
                "type_declaration" => {
                    for spec in type_specs(item) {
                        export_if_capitalized(&mut exports, symbols::declared_name(spec, source));
                    }
                }
                "const_declaration" | "var_declaration" => {
                    for spec in value_specs(item) {
                        let mut cursor = spec.walk();
                        let names: Vec<Node> =
                            spec.children_by_field_name("name", &mut cursor).collect();
                        for name in names {
                            export_if_capitalized(
                                &mut exports,
                                Some(node_text(name, source).to_string()),
                            );
                        }
                    }
                }
                _ => {}
            }
        }
        exports
    }
}

/// `const_spec`/`var_spec` children, also inside grouped spec lists
fn value_specs(declaration: Node) -> Vec<Node> {
    let mut specs = Vec::new();
    for child in named_children(declaration) {
        match child.kind() {
            "const_spec" | "var_spec" => specs.push(child),
            "var_spec_list" => specs.extend(
                named_children(child)
                    .into_iter()
                    .filter(|spec| spec.kind() == "var_spec"),
            ),
            _ => {}
        }
    }
    specs
}

pub(super) fn definition() -> LanguageDefinition {
    LanguageDefinition {
        tag: "go",
        extensions: &["go"],
        grammar: tree_sitter_go::LANGUAGE.into(),
        traverser: Box::new(Go),
        symbols: Box::new(Go),
        imports: Box::new(Go),
        exports: Box::new(Go),
        complexity: RULES,
        call_expression_types: &["call_expression"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::extract_symbols;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_go::LANGUAGE.into()).unwrap();
        parser.parse(source, None).unwrap()
    }

    fn exports(source: &str) -> Vec<String> {
        let tree = parse(source);
        Go.extract_exports(tree.root_node(), source)
    }

    #[test]
    fn test_capitalization_decides_exports() {
        let source = "package demo\n\nfunc helper() {}\n\nfunc Handler() {}\n";
        let found = exports(source);
        assert!(!found.contains(&"helper".to_string()));
        assert!(found.contains(&"Handler".to_string()));
    }

    #[test]
    fn test_exported_types_values_and_methods() {
        let source = r"package demo

type Server struct{}
type config struct{}

const Version = 1
var debug = false

func (s *Server) Start() {}
func (s *Server) stop() {}
func (c config) Apply() {}
";
        assert_eq!(
            exports(source),
            vec!["Server".to_string(), "Version".to_string(), "Start".to_string()]
        );
    }

    #[test]
    fn test_import_forms_and_std_filter() {
        let source = "package demo\n\nimport (\n\t\"fmt\"\n\tnet \"net/http\"\n\t\"github.com/acme/log\"\n\tyaml \"gopkg.in/yaml.v3\"\n\t. \"github.com/acme/dsl\"\n\t_ \"github.com/lib/pq\"\n)\n";
        let tree = parse(source);
        let map = Go.extract_imports(tree.root_node(), source).symbol_map();
        let expected: BTreeMap<String, Vec<String>> = [
            ("github.com/acme/log", vec!["log"]),
            ("gopkg.in/yaml.v3", vec!["yaml"]),
            ("github.com/acme/dsl", vec!["."]),
            ("github.com/lib/pq", vec!["_"]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
        .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_symbols() {
        let source = "package demo\n\ntype Store interface {\n\tGet(key string) string\n}\n\ntype ID int\n\nfunc (s *memStore) Get(key string) string {\n\treturn key\n}\n\nvar handle = func(w int) {}\n";
        let def = definition();
        let tree = parse(source);
        let symbols: Vec<_> = extract_symbols(&def, tree.root_node(), source)
            .into_iter()
            .map(|s| (s.name, s.kind, s.parent_class))
            .collect();

        assert_eq!(
            symbols,
            vec![
                ("Store".to_string(), SymbolKind::Interface, None),
                ("Get".to_string(), SymbolKind::Method, Some("memStore".to_string())),
                ("handle".to_string(), SymbolKind::Function, None),
            ]
        );
    }

    fn outline(source: &str) -> Vec<(String, SymbolKind, usize, usize)> {
        let def = definition();
        let tree = parse(source);
        extract_symbols(&def, tree.root_node(), source)
            .into_iter()
            .map(|s| (s.name, s.kind, s.start_line, s.end_line))
            .collect()
    }

    #[test]
    fn test_grouped_type_declaration_yields_every_spec() {
        let source = "package p\n\ntype (\n\tA struct{}\n\tB interface{}\n\tC int\n)\n";
        assert_eq!(
            outline(source),
            vec![
                ("A".to_string(), SymbolKind::Class, 4, 4),
                ("B".to_string(), SymbolKind::Interface, 5, 5),
            ]
        );
    }

    #[test]
    fn test_lone_type_spans_its_declaration() {
        let source = "package p\n\ntype Point struct {\n\tX int\n}\n";
        let def = definition();
        let tree = parse(source);
        let symbols = extract_symbols(&def, tree.root_node(), source);
        assert_eq!(symbols.len(), 1);
        assert_eq!((symbols[0].start_line, symbols[0].end_line), (3, 5));
        assert!(symbols[0].signature.starts_with("type Point"));
    }

    #[test]
    fn test_grouped_var_binds_function_literal() {
        let source = "package p\n\nvar (\n\tf = func() {}\n\tn = 1\n)\n";
        assert_eq!(
            outline(source),
            vec![("f".to_string(), SymbolKind::Function, 4, 4)]
        );
    }
}
