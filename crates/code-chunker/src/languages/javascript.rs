use super::{
    ExportExtractor, ImportExtractor, LanguageDefinition, LanguageTraverser, SymbolExtractor,
};
use crate::complexity::ComplexityRules;
use crate::symbols::{self, named_children, node_text, unquote, ANONYMOUS};
use crate::types::{ImportEntry, SymbolInfo, SymbolKind};
use tree_sitter::Node;

/// Function values named after their binding, or `anonymous`
pub(super) const FUNCTION_VALUES: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

const TARGETS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "class",
    "method_definition",
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

const CONTAINERS: &[&str] = &["class_declaration", "class"];

const DECLARATIONS: &[&str] = &[
    "lexical_declaration",
    "variable_declaration",
    "expression_statement",
    "field_definition",
    "public_field_definition",
];

const PASS_THROUGH: &[&str] = &["program", "export_statement"];

pub(super) const CALL_TYPES: &[&str] = &["call_expression", "new_expression"];

pub(super) const RULES: ComplexityRules = ComplexityRules {
    decision_points: &[
        "if_statement",
        "for_statement",
        "for_in_statement",
        "while_statement",
        "do_statement",
        "switch_case",
        "catch_clause",
        "ternary_expression",
        "&&",
        "||",
        "??",
    ],
    nesting_types: &[
        "if_statement",
        "for_statement",
        "for_in_statement",
        "while_statement",
        "do_statement",
        "switch_statement",
        "catch_clause",
    ],
    non_nesting_types: &["else_clause", "ternary_expression", "switch_case"],
    operator_symbols: &[
        "=", "+=", "-=", "*=", "/=", "%=", "**=", "&=", "|=", "^=", "<<=", ">>=", ">>>=", "&&=",
        "||=", "??=", "+", "-", "*", "/", "%", "**", "++", "--", "==", "===", "!=", "!==", "<",
        ">", "<=", ">=", "&&", "||", "??", "!", "&", "|", "^", "~", "<<", ">>", ">>>", "?", ":",
        ".", "?.", "...", ",", ";", "(", "[", "{", "=>",
    ],
    operator_keywords: &[
        "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
        "return", "throw", "try", "catch", "finally", "new", "delete", "typeof", "instanceof",
        "in", "of", "void", "await", "yield", "function", "class", "const", "let", "var", "async",
    ],
    atomic_operand_types: &["string", "template_string", "regex"],
};

/// JavaScript strategies; TypeScript delegates here for everything it does
/// not refine
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct JavaScript;

impl LanguageTraverser for JavaScript {
    fn target_types(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn container_types(&self) -> &'static [&'static str] {
        CONTAINERS
    }

    fn declaration_types(&self) -> &'static [&'static str] {
        DECLARATIONS
    }

    fn pass_through_types(&self) -> &'static [&'static str] {
        PASS_THROUGH
    }

    fn function_value_types(&self) -> &'static [&'static str] {
        FUNCTION_VALUES
    }
}

impl SymbolExtractor for JavaScript {
    fn extract_symbol(
        &self,
        node: Node,
        source: &str,
        parent_class: Option<&str>,
    ) -> Option<SymbolInfo> {
        let (name, kind) = match node.kind() {
            "class_declaration" => (symbols::declared_name(node, source)?, SymbolKind::Class),
            "class" => (
                symbols::declared_name(node, source).unwrap_or_else(|| ANONYMOUS.to_string()),
                SymbolKind::Class,
            ),
            "method_definition" => (symbols::declared_name(node, source)?, SymbolKind::Method),
            "function_declaration" | "generator_function_declaration" => (
                symbols::declared_name(node, source)?,
                symbols::function_kind(parent_class),
            ),
            kind if FUNCTION_VALUES.contains(&kind) => (
                symbols::declared_name(node, source).unwrap_or_else(|| ANONYMOUS.to_string()),
                symbols::function_kind(parent_class),
            ),
            _ => return None,
        };

        let mut symbol = symbols::symbol_from_node(node, source, name, kind, parent_class);
        if symbol.parameters.is_empty() {
            symbol.parameters = symbols::parameters(node, "parameter", source);
        }
        Some(symbol)
    }
}

impl ImportExtractor for JavaScript {
    fn import_types(&self) -> &'static [&'static str] {
        &["import_statement", "call_expression"]
    }

    fn process_import_symbols(&self, node: Node, source: &str) -> Vec<ImportEntry> {
        let entry = match node.kind() {
            "import_statement" => es_import(node, source),
            "call_expression" => call_import(node, source),
            _ => None,
        };
        entry.into_iter().collect()
    }
}

/// `import a, { b as c } from 'x'`, `import * as ns from 'x'`, `import 'x'`
/// and TypeScript `import a = require('x')`
fn es_import(node: Node, source: &str) -> Option<ImportEntry> {
    let children = named_children(node);
    let require_clause = children
        .iter()
        .copied()
        .find(|child| child.kind() == "import_require_clause");
    let path_node = node
        .child_by_field_name("source")
        .or_else(|| require_clause.and_then(|clause| clause.child_by_field_name("source")))?;

    let mut names = Vec::new();
    for child in children {
        match child.kind() {
            "import_clause" => {
                for part in named_children(child) {
                    match part.kind() {
                        "identifier" => names.push(node_text(part, source).to_string()),
                        "namespace_import" => names.extend(
                            named_children(part)
                                .into_iter()
                                .filter(|n| n.kind() == "identifier")
                                .map(|n| node_text(n, source).to_string()),
                        ),
                        "named_imports" => {
                            for spec in named_children(part) {
                                if spec.kind() != "import_specifier" {
                                    continue;
                                }
                                let binding = spec
                                    .child_by_field_name("alias")
                                    .or_else(|| spec.child_by_field_name("name"));
                                if let Some(binding) = binding {
                                    names.push(unquote(node_text(binding, source)));
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            "import_require_clause" => names.extend(
                named_children(child)
                    .into_iter()
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| node_text(n, source).to_string()),
            ),
            _ => {}
        }
    }

    Some(ImportEntry::new(unquote(node_text(path_node, source)), names))
}

/// `require('x')` with its bindings, or dynamic `import('x')`
fn call_import(node: Node, source: &str) -> Option<ImportEntry> {
    let function = node.child_by_field_name("function")?;
    let is_require = function.kind() == "identifier" && node_text(function, source) == "require";
    if !is_require && function.kind() != "import" {
        return None;
    }

    let argument = node.child_by_field_name("arguments")?.named_child(0)?;
    if argument.kind() != "string" {
        return None;
    }

    let names = if is_require {
        require_bindings(node, source)
    } else {
        Vec::new()
    };
    Some(ImportEntry::new(unquote(node_text(argument, source)), names))
}

/// Names bound by `const x = require(...)` or `const { a, b: c } = require(...)`
fn require_bindings(call: Node, source: &str) -> Vec<String> {
    let Some(declarator) = call.parent().filter(|p| p.kind() == "variable_declarator") else {
        return Vec::new();
    };
    let Some(pattern) = declarator.child_by_field_name("name") else {
        return Vec::new();
    };

    match pattern.kind() {
        "identifier" => vec![node_text(pattern, source).to_string()],
        "object_pattern" => named_children(pattern)
            .into_iter()
            .filter_map(|prop| match prop.kind() {
                "shorthand_property_identifier_pattern" => Some(node_text(prop, source).to_string()),
                "pair_pattern" => prop
                    .child_by_field_name("value")
                    .and_then(|value| symbols::simple_name(value, source)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl ExportExtractor for JavaScript {
    fn extract_exports(&self, root: Node, source: &str) -> Vec<String> {
        let mut exports = Vec::new();
        for child in named_children(root) {
            if child.kind() == "export_statement" {
                export_statement_names(child, source, &mut exports);
            }
        }
        exports
    }

    /// Nameless symbols of `export default` stand for the `default` export
    fn is_exported_symbol(&self, node: Node, symbol: &SymbolInfo, exports: &[String]) -> bool {
        if exports.contains(&symbol.name) {
            return true;
        }
        symbol.name == ANONYMOUS
            && exports.iter().any(|name| name == "default")
            && node
                .parent()
                .is_some_and(|parent| parent.kind() == "export_statement" && is_default_export(parent))
    }
}

fn is_default_export(statement: Node) -> bool {
    let mut cursor = statement.walk();
    let found = statement.children(&mut cursor).any(|c| c.kind() == "default");
    found
}

fn export_statement_names(node: Node, source: &str, exports: &mut Vec<String>) {
    let is_default = is_default_export(node);

    if let Some(declaration) = node.child_by_field_name("declaration") {
        for name in declaration_names(declaration, source) {
            symbols::export(exports, Some(name));
        }
    }
    if let Some(value) = node.child_by_field_name("value") {
        let name = if value.kind() == "identifier" {
            Some(node_text(value, source).to_string())
        } else {
            symbols::declared_name(value, source)
        };
        symbols::export(exports, name);
    }

    for child in named_children(node) {
        match child.kind() {
            "export_clause" => {
                for spec in named_children(child) {
                    if spec.kind() != "export_specifier" {
                        continue;
                    }
                    let binding = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    symbols::export(exports, binding.map(|b| unquote(node_text(b, source))));
                }
            }
            "namespace_export" => {
                let name = named_children(child)
                    .into_iter()
                    .find(|n| n.kind() == "identifier" || n.kind() == "string")
                    .map(|n| unquote(node_text(n, source)));
                symbols::export(exports, name);
            }
            _ => {}
        }
    }

    if is_default {
        symbols::export(exports, Some("default".to_string()));
    }
}

/// Names introduced by an exported declaration
pub(super) fn declaration_names(declaration: Node, source: &str) -> Vec<String> {
    match declaration.kind() {
        "lexical_declaration" | "variable_declaration" => named_children(declaration)
            .into_iter()
            .filter(|child| child.kind() == "variable_declarator")
            .filter_map(|declarator| symbols::declared_name(declarator, source))
            .collect(),
        "ambient_declaration" => named_children(declaration)
            .into_iter()
            .flat_map(|child| declaration_names(child, source))
            .collect(),
        _ => symbols::declared_name(declaration, source).into_iter().collect(),
    }
}

pub(super) fn definition() -> LanguageDefinition {
    LanguageDefinition {
        tag: "javascript",
        extensions: &["js", "jsx", "mjs", "cjs"],
        grammar: tree_sitter_javascript::LANGUAGE.into(),
        traverser: Box::new(JavaScript),
        symbols: Box::new(JavaScript),
        imports: Box::new(JavaScript),
        exports: Box::new(JavaScript),
        complexity: RULES,
        call_expression_types: CALL_TYPES,
    }
}
