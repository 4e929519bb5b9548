use super::{
    ExportExtractor, ImportExtractor, LanguageDefinition, LanguageTraverser, SymbolExtractor,
};
use crate::complexity::ComplexityRules;
use crate::symbols::{self, named_children, node_text};
use crate::types::{ImportEntry, SymbolInfo, SymbolKind};
use tree_sitter::Node;

const RULES: ComplexityRules = ComplexityRules {
    decision_points: &[
        "if_statement",
        "elif_clause",
        "for_statement",
        "while_statement",
        "except_clause",
        "conditional_expression",
        "case_clause",
        "for_in_clause",
        "if_clause",
        "and",
        "or",
    ],
    nesting_types: &[
        "if_statement",
        "for_statement",
        "while_statement",
        "except_clause",
        "match_statement",
    ],
    non_nesting_types: &[
        "elif_clause",
        "else_clause",
        "conditional_expression",
        "case_clause",
    ],
    operator_symbols: &[
        "=", "+=", "-=", "*=", "/=", "//=", "%=", "**=", "@=", "&=", "|=", "^=", "<<=", ">>=",
        ":=", "+", "-", "*", "/", "//", "%", "**", "@", "==", "!=", "<", ">", "<=", ">=", "&",
        "|", "^", "~", "<<", ">>", "->", ".", ",", ":", "(", "[", "{",
    ],
    operator_keywords: &[
        "and", "or", "not", "in", "is", "if", "elif", "else", "for", "while", "return", "yield",
        "await", "async", "def", "class", "lambda", "try", "except", "finally", "raise", "with",
        "as", "pass", "break", "continue", "del", "global", "nonlocal", "assert", "match",
        "case",
    ],
    atomic_operand_types: &["string", "concatenated_string"],
};

#[derive(Debug, Clone, Copy, Default)]
struct Python;

impl LanguageTraverser for Python {
    fn target_types(&self) -> &'static [&'static str] {
        &["function_definition", "class_definition"]
    }

    fn container_types(&self) -> &'static [&'static str] {
        &["class_definition"]
    }

    fn declaration_types(&self) -> &'static [&'static str] {
        &["expression_statement"]
    }

    fn pass_through_types(&self) -> &'static [&'static str] {
        &["module", "decorated_definition"]
    }

    fn function_value_types(&self) -> &'static [&'static str] {
        &["lambda"]
    }
}

impl SymbolExtractor for Python {
    fn extract_symbol(
        &self,
        node: Node,
        source: &str,
        parent_class: Option<&str>,
    ) -> Option<SymbolInfo> {
        let kind = match node.kind() {
            "class_definition" => SymbolKind::Class,
            "function_definition" => symbols::function_kind(parent_class),
            _ => return None,
        };
        let name = symbols::declared_name(node, source)?;
        let mut symbol = symbols::symbol_from_node(node, source, name, kind, parent_class);
        if kind == SymbolKind::Class {
            symbol.parameters = symbols::parameters(node, "superclasses", source);
        }
        Some(symbol)
    }
}

impl ImportExtractor for Python {
    fn import_types(&self) -> &'static [&'static str] {
        &["import_statement", "import_from_statement"]
    }

    fn process_import_symbols(&self, node: Node, source: &str) -> Vec<ImportEntry> {
        let names = {
            let mut cursor = node.walk();
            let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
            names
        };

        match node.kind() {
            // import a.b, c as d
            "import_statement" => names
                .into_iter()
                .filter_map(|name| match name.kind() {
                    "aliased_import" => {
                        let path = symbols::field_text(name, "name", source)?;
                        let alias = symbols::field_text(name, "alias", source)?;
                        Some(ImportEntry::new(path, vec![alias]))
                    }
                    _ => {
                        let path = node_text(name, source).to_string();
                        let binding = path.split('.').next().unwrap_or_default().to_string();
                        Some(ImportEntry::new(path, vec![binding]))
                    }
                })
                .collect(),

            // from .x import y as z, *
            "import_from_statement" => {
                let Some(module) = symbols::field_text(node, "module_name", source) else {
                    return Vec::new();
                };
                let mut bindings: Vec<String> = names
                    .into_iter()
                    .filter_map(|name| match name.kind() {
                        "aliased_import" => symbols::field_text(name, "alias", source),
                        _ => Some(node_text(name, source).to_string()),
                    })
                    .collect();
                if named_children(node)
                    .iter()
                    .any(|child| child.kind() == "wildcard_import")
                {
                    bindings.push("*".to_string());
                }
                vec![ImportEntry::new(module, bindings)]
            }
            _ => Vec::new(),
        }
    }
}

impl ExportExtractor for Python {
    fn extract_exports(&self, root: Node, source: &str) -> Vec<String> {
        let mut exports = Vec::new();
        for child in named_children(root) {
            let definition = if child.kind() == "decorated_definition" {
                child.child_by_field_name("definition")
            } else {
                Some(child)
            };
            let Some(definition) = definition else {
                continue;
            };
            if matches!(
                definition.kind(),
                "function_definition" | "class_definition"
            ) {
                symbols::export(&mut exports, symbols::declared_name(definition, source));
            }
        }
        exports
    }
}

pub(super) fn definition() -> LanguageDefinition {
    LanguageDefinition {
        tag: "python",
        extensions: &["py", "pyi"],
        grammar: tree_sitter_python::LANGUAGE.into(),
        traverser: Box::new(Python),
        symbols: Box::new(Python),
        imports: Box::new(Python),
        exports: Box::new(Python),
        complexity: RULES,
        call_expression_types: &["call"],
    }
}
