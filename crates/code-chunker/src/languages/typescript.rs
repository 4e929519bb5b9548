//! TypeScript and TSX: the JavaScript strategies plus interfaces, abstract
//! classes, method signatures and namespaces.

use super::javascript::{self, JavaScript, FUNCTION_VALUES};
use super::{
    ExportExtractor, ImportExtractor, LanguageDefinition, LanguageTraverser, SymbolExtractor,
};
use crate::symbols;
use crate::types::{ImportEntry, SymbolInfo, SymbolKind};
use tree_sitter::Node;

const TARGETS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "class",
    "abstract_class_declaration",
    "interface_declaration",
    "method_definition",
    "method_signature",
    "abstract_method_signature",
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

const CONTAINERS: &[&str] = &[
    "class_declaration",
    "class",
    "abstract_class_declaration",
    "interface_declaration",
];

const PASS_THROUGH: &[&str] = &[
    "program",
    "export_statement",
    "ambient_declaration",
    "internal_module",
    "module",
    "statement_block",
    "expression_statement",
];

#[derive(Debug, Clone, Copy, Default)]
struct TypeScript {
    base: JavaScript,
}

impl LanguageTraverser for TypeScript {
    fn target_types(&self) -> &'static [&'static str] {
        TARGETS
    }

    fn container_types(&self) -> &'static [&'static str] {
        CONTAINERS
    }

    fn declaration_types(&self) -> &'static [&'static str] {
        self.base.declaration_types()
    }

    fn pass_through_types(&self) -> &'static [&'static str] {
        PASS_THROUGH
    }

    fn function_value_types(&self) -> &'static [&'static str] {
        FUNCTION_VALUES
    }
}

impl SymbolExtractor for TypeScript {
    fn extract_symbol(
        &self,
        node: Node,
        source: &str,
        parent_class: Option<&str>,
    ) -> Option<SymbolInfo> {
        let kind = match node.kind() {
            "interface_declaration" => SymbolKind::Interface,
            "abstract_class_declaration" => SymbolKind::Class,
            "method_signature" | "abstract_method_signature" => SymbolKind::Method,
            _ => return self.base.extract_symbol(node, source, parent_class),
        };

        let name = symbols::declared_name(node, source)?;
        Some(symbols::symbol_from_node(node, source, name, kind, parent_class))
    }
}

impl ImportExtractor for TypeScript {
    fn import_types(&self) -> &'static [&'static str] {
        self.base.import_types()
    }

    fn process_import_symbols(&self, node: Node, source: &str) -> Vec<ImportEntry> {
        self.base.process_import_symbols(node, source)
    }
}

impl ExportExtractor for TypeScript {
    fn extract_exports(&self, root: Node, source: &str) -> Vec<String> {
        self.base.extract_exports(root, source)
    }

    fn is_exported_symbol(&self, node: Node, symbol: &SymbolInfo, exports: &[String]) -> bool {
        self.base.is_exported_symbol(node, symbol, exports)
    }
}

fn build(
    tag: &'static str,
    extensions: &'static [&'static str],
    grammar: tree_sitter::Language,
) -> LanguageDefinition {
    LanguageDefinition {
        tag,
        extensions,
        grammar,
        traverser: Box::new(TypeScript::default()),
        symbols: Box::new(TypeScript::default()),
        imports: Box::new(TypeScript::default()),
        exports: Box::new(TypeScript::default()),
        complexity: javascript::RULES,
        call_expression_types: javascript::CALL_TYPES,
    }
}

pub(super) fn definition() -> LanguageDefinition {
    build(
        "typescript",
        &["ts", "mts", "cts"],
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
    )
}

pub(super) fn tsx_definition() -> LanguageDefinition {
    build("tsx", &["tsx"], tree_sitter_typescript::LANGUAGE_TSX.into())
}
