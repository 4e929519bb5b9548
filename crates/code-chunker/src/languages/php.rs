use super::{
    ExportExtractor, ImportExtractor, LanguageDefinition, LanguageTraverser, SymbolExtractor,
};
use crate::complexity::ComplexityRules;
use crate::symbols::{self, named_children, node_text};
use crate::types::{ImportEntry, SymbolInfo, SymbolKind};
use tree_sitter::Node;

const TYPE_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "trait_declaration",
    "enum_declaration",
];

const RULES: ComplexityRules = ComplexityRules {
    decision_points: &[
        "if_statement",
        "else_if_clause",
        "for_statement",
        "foreach_statement",
        "while_statement",
        "do_statement",
        "catch_clause",
        "conditional_expression",
        "case_statement",
        "match_conditional_expression",
        "&&",
        "||",
        "and",
        "or",
        "??",
    ],
    nesting_types: &[
        "if_statement",
        "for_statement",
        "foreach_statement",
        "while_statement",
        "do_statement",
        "catch_clause",
        "switch_statement",
        "match_expression",
    ],
    non_nesting_types: &[
        "else_if_clause",
        "else_clause",
        "conditional_expression",
        "case_statement",
        "match_conditional_expression",
    ],
    operator_symbols: &[
        "=", "+=", "-=", "*=", "/=", ".=", "%=", "**=", "??=", "&=", "|=", "^=", "<<=", ">>=",
        "+", "-", "*", "/", "%", "**", ".", "==", "===", "!=", "!==", "<>", "<", ">", "<=",
        ">=", "<=>", "&&", "||", "!", "??", "&", "|", "^", "~", "<<", ">>", "++", "--", "->",
        "?->", "::", "=>", ",", ";", ":", "?", "(", "[", "{",
    ],
    operator_keywords: &[
        "if", "elseif", "else", "for", "foreach", "as", "while", "do", "switch", "case",
        "default", "match", "break", "continue", "return", "throw", "try", "catch", "finally",
        "new", "instanceof", "function", "fn", "class", "interface", "trait", "enum", "extends",
        "implements", "static", "public", "private", "protected", "abstract", "final", "echo",
        "yield", "and", "or", "xor",
    ],
    atomic_operand_types: &[
        "string",
        "encapsed_string",
        "heredoc",
        "nowdoc",
        "variable_name",
    ],
};

#[derive(Debug, Clone, Copy, Default)]
struct Php;

impl LanguageTraverser for Php {
    fn target_types(&self) -> &'static [&'static str] {
        &[
            "class_declaration",
            "interface_declaration",
            "trait_declaration",
            "enum_declaration",
            "function_definition",
            "method_declaration",
        ]
    }

    fn container_types(&self) -> &'static [&'static str] {
        TYPE_DECLARATIONS
    }

    fn declaration_types(&self) -> &'static [&'static str] {
        &["expression_statement"]
    }

    fn pass_through_types(&self) -> &'static [&'static str] {
        &["program", "namespace_definition", "compound_statement"]
    }

    fn function_value_types(&self) -> &'static [&'static str] {
        &[
            "anonymous_function",
            "anonymous_function_creation_expression",
            "arrow_function",
        ]
    }
}

impl SymbolExtractor for Php {
    fn extract_symbol(
        &self,
        node: Node,
        source: &str,
        parent_class: Option<&str>,
    ) -> Option<SymbolInfo> {
        let kind = match node.kind() {
            "class_declaration" | "trait_declaration" | "enum_declaration" => SymbolKind::Class,
            "interface_declaration" => SymbolKind::Interface,
            "function_definition" | "method_declaration" => symbols::function_kind(parent_class),
            _ => return None,
        };
        let name = symbols::declared_name(node, source)?;
        Some(symbols::symbol_from_node(node, source, name, kind, parent_class))
    }
}

impl ImportExtractor for Php {
    fn import_types(&self) -> &'static [&'static str] {
        &["namespace_use_declaration"]
    }

    /// `use A\B\C;`, `use A\B as D;`, `use function A\f;` and grouped
    /// `use A\{B, C as D};`. The path is the namespace, the symbol the last
    /// segment or its alias
    fn process_import_symbols(&self, node: Node, source: &str) -> Vec<ImportEntry> {
        let text = node_text(node, source).trim().trim_end_matches(';').trim();
        let Some(body) = text.strip_prefix("use") else {
            return Vec::new();
        };
        let body = body.trim_start();
        let body = ["function ", "const "]
            .iter()
            .find_map(|kind| body.strip_prefix(kind))
            .unwrap_or(body);

        let mut entries = Vec::new();
        match body.split_once('{') {
            Some((prefix, group)) => {
                let prefix = prefix.trim().trim_end_matches('\\');
                let group = group.trim().trim_end_matches('}');
                for clause in group.split(',') {
                    let clause = clause.trim();
                    if !clause.is_empty() {
                        entries.extend(use_clause(&format!("{prefix}\\{clause}")));
                    }
                }
            }
            None => {
                for clause in body.split(',') {
                    entries.extend(use_clause(clause));
                }
            }
        }
        entries
    }
}

/// One `Name\Space\Item [as Alias]` clause
fn use_clause(clause: &str) -> Option<ImportEntry> {
    let mut words = clause.split_whitespace();
    let qualified = words.next()?.trim_start_matches('\\');
    let alias = match (words.next(), words.next()) {
        (Some(keyword), Some(alias)) if keyword.eq_ignore_ascii_case("as") => Some(alias),
        _ => None,
    };

    let (path, item) = qualified
        .rsplit_once('\\')
        .filter(|(path, item)| !path.is_empty() && !item.is_empty())
        .unwrap_or((qualified, qualified));
    if path.is_empty() {
        return None;
    }
    Some(ImportEntry::new(path, vec![alias.unwrap_or(item).to_string()]))
}

impl ExportExtractor for Php {
    fn extract_exports(&self, root: Node, source: &str) -> Vec<String> {
        let mut exports = Vec::new();
        export_scope(root, source, &mut exports);
        exports
    }
}

fn export_scope(scope: Node, source: &str, exports: &mut Vec<String>) {
    for item in named_children(scope) {
        match item.kind() {
            "namespace_definition" => {
                if let Some(body) = item.child_by_field_name("body") {
                    export_scope(body, source, exports);
                }
            }
            kind if kind == "function_definition" || TYPE_DECLARATIONS.contains(&kind) => {
                symbols::export(exports, symbols::declared_name(item, source));
            }
            _ => {}
        }
    }
}

pub(super) fn definition() -> LanguageDefinition {
    LanguageDefinition {
        tag: "php",
        extensions: &["php"],
        grammar: tree_sitter_php::LANGUAGE_PHP.into(),
        traverser: Box::new(Php),
        symbols: Box::new(Php),
        imports: Box::new(Php),
        exports: Box::new(Php),
        complexity: RULES,
        call_expression_types: &[
            "function_call_expression",
            "member_call_expression",
            "scoped_call_expression",
            "nullsafe_member_call_expression",
            "object_creation_expression",
        ],
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
        parser.set_language(&tree_sitter_php::LANGUAGE_PHP.into()).unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_use_clause_forms() {
        let entry = |path: &str, symbol: &str| Some(ImportEntry::new(path, vec![symbol.into()]));
        assert_eq!(use_clause("App\\Models\\User"), entry("App\\Models", "User"));
        assert_eq!(use_clause(" \\App\\Post as Article "), entry("App", "Article"));
        assert_eq!(use_clause("Closure"), entry("Closure", "Closure"));
        assert_eq!(use_clause("   "), None);
    }

    #[test]
    fn test_namespaced_imports() {
        let source = "<?php\nnamespace App\\Http;\n\nuse App\\Models\\User;\nuse App\\Models\\Post as Article;\nuse function App\\Support\\format_money;\nuse App\\Events\\{Created, Deleted as Removed};\n";
        let tree = parse(source);
        let map = Php.extract_imports(tree.root_node(), source).symbol_map();
        let expected: BTreeMap<String, Vec<String>> = [
            ("App\\Models", vec!["User", "Article"]),
            ("App\\Support", vec!["format_money"]),
            ("App\\Events", vec!["Created", "Removed"]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
        .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_top_level_exports() {
        let source = r"<?php
namespace App;

interface Repository {}
trait Loggable {}

class UserRepository implements Repository
{
    public function find($id) { return null; }
}

function helper() {
    function inner() {}
}
";
        let tree = parse(source);
        assert_eq!(
            Php.extract_exports(tree.root_node(), source),
            vec!["Repository", "Loggable", "UserRepository", "helper"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_symbols_and_closure_binding() {
        let source = "<?php\nclass Mailer\n{\n    public function send(string $to): bool\n    {\n        return true;\n    }\n}\n\n$format = function ($value) {\n    return $value;\n};\n";
        let def = definition();
        let tree = parse(source);
        let symbols = extract_symbols(&def, tree.root_node(), source);
        let summary: Vec<_> = symbols
            .iter()
            .map(|s| (s.name.as_str(), s.kind, s.parent_class.as_deref()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Mailer", SymbolKind::Class, None),
                ("send", SymbolKind::Method, Some("Mailer")),
                ("format", SymbolKind::Function, None),
            ]
        );
        assert_eq!(symbols[1].return_type.as_deref(), Some("bool"));
    }
}
