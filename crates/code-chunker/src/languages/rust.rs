use super::{
    ExportExtractor, ImportExtractor, LanguageDefinition, LanguageTraverser, SymbolExtractor,
};
use crate::complexity::ComplexityRules;
use crate::symbols::{self, named_children, node_text};
use crate::types::{ImportEntry, SymbolInfo, SymbolKind};
use tree_sitter::Node;

const STD_CRATES: &[&str] = &["std", "core", "alloc"];

const RULES: ComplexityRules = ComplexityRules {
    decision_points: &[
        "if_expression",
        "while_expression",
        "for_expression",
        "match_arm",
        "&&",
        "||",
    ],
    nesting_types: &[
        "if_expression",
        "while_expression",
        "for_expression",
        "loop_expression",
        "match_expression",
    ],
    non_nesting_types: &["else_clause", "match_arm"],
    operator_symbols: &[
        "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "+", "-", "*", "/", "%",
        "==", "!=", "<", ">", "<=", ">=", "&&", "||", "!", "&", "|", "^", "<<", ">>", "?", ".",
        "..", "..=", "::", "->", "=>", ",", ";", ":", "(", "[", "{",
    ],
    operator_keywords: &[
        "if", "else", "match", "for", "while", "loop", "in", "return", "break", "continue", "let",
        "mut", "fn", "impl", "struct", "enum", "trait", "pub", "use", "mod", "as", "move", "ref",
        "unsafe", "async", "await", "where", "dyn", "const", "static", "type",
    ],
    atomic_operand_types: &["string_literal", "raw_string_literal", "char_literal"],
};

#[derive(Debug, Clone, Copy, Default)]
struct Rust;

impl LanguageTraverser for Rust {
    fn target_types(&self) -> &'static [&'static str] {
        &[
            "function_item",
            "function_signature_item",
            "struct_item",
            "enum_item",
            "union_item",
            "trait_item",
        ]
    }

    fn container_types(&self) -> &'static [&'static str] {
        &["impl_item", "trait_item"]
    }

    fn declaration_types(&self) -> &'static [&'static str] {
        &["const_item", "static_item"]
    }

    fn pass_through_types(&self) -> &'static [&'static str] {
        &["source_file", "mod_item", "declaration_list"]
    }

    fn function_value_types(&self) -> &'static [&'static str] {
        &["closure_expression"]
    }

    /// `impl Foo`, `impl<T> Trait for Foo<T>` → `Foo`
    fn container_name(&self, node: Node, source: &str) -> Option<String> {
        if node.kind() == "impl_item" {
            return node
                .child_by_field_name("type")
                .and_then(|ty| symbols::simple_name(ty, source));
        }
        symbols::declared_name(node, source)
    }
}

impl SymbolExtractor for Rust {
    fn extract_symbol(
        &self,
        node: Node,
        source: &str,
        parent_class: Option<&str>,
    ) -> Option<SymbolInfo> {
        let kind = match node.kind() {
            "function_item" | "function_signature_item" => symbols::function_kind(parent_class),
            "struct_item" | "enum_item" | "union_item" => SymbolKind::Class,
            "trait_item" => SymbolKind::Interface,
            _ => return None,
        };
        let name = symbols::declared_name(node, source)?;
        Some(symbols::symbol_from_node(node, source, name, kind, parent_class))
    }
}

impl ImportExtractor for Rust {
    fn import_types(&self) -> &'static [&'static str] {
        &["use_declaration"]
    }

    fn process_import_symbols(&self, node: Node, source: &str) -> Vec<ImportEntry> {
        let mut entries = Vec::new();
        if let Some(argument) = node.child_by_field_name("argument") {
            flatten_use(argument, "", source, &mut entries);
        }
        entries
    }

    fn is_standard_library(&self, path: &str) -> bool {
        let root = path.split("::").next().unwrap_or(path);
        STD_CRATES.contains(&root)
    }
}

fn join_path(prefix: &str, rest: &str) -> String {
    let rest: String = rest.split_whitespace().collect();
    match (prefix.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (_, true) => prefix.to_string(),
        _ => format!("{prefix}::{rest}"),
    }
}

/// `a::b::c` → (`a::b`, `c`); single segments name themselves
fn split_last(path: &str) -> (String, String) {
    match path.rsplit_once("::") {
        Some((module, item)) => (module.to_string(), item.to_string()),
        None => (path.to_string(), path.to_string()),
    }
}

/// Expand one use tree into `{module path, bound names}` entries
fn flatten_use(node: Node, prefix: &str, source: &str, entries: &mut Vec<ImportEntry>) {
    match node.kind() {
        "use_list" => {
            for child in named_children(node) {
                flatten_use(child, prefix, source, entries);
            }
        }
        "scoped_use_list" => {
            let nested = node
                .child_by_field_name("path")
                .map(|path| join_path(prefix, node_text(path, source)))
                .unwrap_or_else(|| prefix.to_string());
            if let Some(list) = node.child_by_field_name("list") {
                flatten_use(list, &nested, source, entries);
            }
        }
        "use_as_clause" => {
            let Some(path) = node.child_by_field_name("path") else {
                return;
            };
            let full = join_path(prefix, node_text(path, source));
            let (module, _) = split_last(&full);
            if let Some(alias) = symbols::field_text(node, "alias", source) {
                entries.push(ImportEntry::new(module, vec![alias]));
            }
        }
        "use_wildcard" => {
            let module = node
                .named_child(0)
                .map(|path| join_path(prefix, node_text(path, source)))
                .unwrap_or_else(|| prefix.to_string());
            entries.push(ImportEntry::new(module, vec!["*".to_string()]));
        }
        "self" if !prefix.is_empty() => {
            let (_, binding) = split_last(prefix);
            entries.push(ImportEntry::new(prefix, vec![binding]));
        }
        _ => {
            let full = join_path(prefix, node_text(node, source));
            if full.is_empty() {
                return;
            }
            let (module, item) = split_last(&full);
            entries.push(ImportEntry::new(module, vec![item]));
        }
    }
}

/// Bare `pub`; restricted visibility (`pub(crate)`, `pub(super)`) is internal
fn is_pub(node: Node, source: &str) -> bool {
    named_children(node)
        .into_iter()
        .any(|child| child.kind() == "visibility_modifier" && node_text(child, source).trim() == "pub")
}

impl ExportExtractor for Rust {
    fn extract_exports(&self, root: Node, source: &str) -> Vec<String> {
        let mut exports = Vec::new();
        let mut impls = Vec::new();
        collect_pub_items(root, source, &mut exports, &mut impls);

        for impl_item in impls {
            let exported_type = impl_item
                .child_by_field_name("type")
                .and_then(|ty| symbols::simple_name(ty, source))
                .is_some_and(|name| exports.contains(&name));
            if !exported_type {
                continue;
            }
            let Some(body) = impl_item.child_by_field_name("body") else {
                continue;
            };
            for member in named_children(body) {
                if member.kind() == "function_item" && is_pub(member, source) {
                    symbols::export(&mut exports, symbols::declared_name(member, source));
                }
            }
        }

        exports
    }
}

fn collect_pub_items<'t>(
    scope: Node<'t>,
    source: &str,
    exports: &mut Vec<String>,
    impls: &mut Vec<Node<'t>>,
) {
    for item in named_children(scope) {
        if item.kind() == "impl_item" {
            impls.push(item);
            continue;
        }
        if !is_pub(item, source) {
            continue;
        }

        match item.kind() {
            "function_item" | "struct_item" | "enum_item" | "union_item" | "type_item"
            | "const_item" | "static_item" | "macro_definition" => {
                symbols::export(exports, symbols::declared_name(item, source));
            }
            "trait_item" => {
                symbols::export(exports, symbols::declared_name(item, source));
                if let Some(body) = item.child_by_field_name("body") {
                    for member in named_children(body) {
                        if matches!(member.kind(), "function_item" | "function_signature_item") {
                            symbols::export(exports, symbols::declared_name(member, source));
                        }
                    }
                }
            }
            "mod_item" => {
                symbols::export(exports, symbols::declared_name(item, source));
                if let Some(body) = item.child_by_field_name("body") {
                    collect_pub_items(body, source, exports, impls);
                }
            }
            "use_declaration" => {
                let mut entries = Vec::new();
                if let Some(argument) = item.child_by_field_name("argument") {
                    flatten_use(argument, "", source, &mut entries);
                }
                for name in entries.into_iter().flat_map(|entry| entry.symbols) {
                    if name != "*" {
                        symbols::export(exports, Some(name));
                    }
                }
            }
            _ => {}
        }
    }
}

pub(super) fn definition() -> LanguageDefinition {
    LanguageDefinition {
        tag: "rust",
        extensions: &["rs"],
        grammar: tree_sitter_rust::LANGUAGE.into(),
        traverser: Box::new(Rust),
        symbols: Box::new(Rust),
        imports: Box::new(Rust),
        exports: Box::new(Rust),
        complexity: RULES,
        call_expression_types: &["call_expression", "macro_invocation"],
    }
}
