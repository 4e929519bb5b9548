use super::{
    ExportExtractor, ImportExtractor, LanguageDefinition, LanguageTraverser, SymbolExtractor,
};
use crate::complexity::{ComplexityRules, C_FAMILY_OPERATORS};
use crate::symbols::{self, has_modifier, named_children, node_text};
use crate::types::{ImportEntry, SymbolInfo, SymbolKind};
use tree_sitter::Node;

const TYPE_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "struct_declaration",
    "record_declaration",
    "interface_declaration",
];

const RULES: ComplexityRules = ComplexityRules {
    decision_points: &[
        "if_statement",
        "for_statement",
        "foreach_statement",
        "while_statement",
        "do_statement",
        "catch_clause",
        "conditional_expression",
        "switch_section",
        "switch_expression_arm",
        "&&",
        "||",
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
        "switch_expression",
    ],
    non_nesting_types: &[
        "else",
        "conditional_expression",
        "switch_section",
        "switch_expression_arm",
    ],
    operator_symbols: C_FAMILY_OPERATORS,
    operator_keywords: &[
        "if", "else", "for", "foreach", "in", "while", "do", "switch", "case", "default", "break",
        "continue", "return", "throw", "try", "catch", "finally", "new", "is", "as", "typeof",
        "await", "async", "class", "struct", "record", "interface", "enum", "static", "public",
        "private", "protected", "internal", "var", "void", "using", "yield",
    ],
    atomic_operand_types: &[
        "string_literal",
        "verbatim_string_literal",
        "raw_string_literal",
        "interpolated_string_expression",
        "character_literal",
    ],
};

#[derive(Debug, Clone, Copy, Default)]
struct CSharp;

impl LanguageTraverser for CSharp {
    fn target_types(&self) -> &'static [&'static str] {
        &[
            "class_declaration",
            "struct_declaration",
            "record_declaration",
            "interface_declaration",
            "method_declaration",
            "constructor_declaration",
            "local_function_statement",
        ]
    }

    fn container_types(&self) -> &'static [&'static str] {
        TYPE_DECLARATIONS
    }

    fn declaration_types(&self) -> &'static [&'static str] {
        &["field_declaration"]
    }

    fn pass_through_types(&self) -> &'static [&'static str] {
        &[
            "compilation_unit",
            "namespace_declaration",
            "file_scoped_namespace_declaration",
            "declaration_list",
            "global_statement",
        ]
    }

    fn function_value_types(&self) -> &'static [&'static str] {
        &["lambda_expression", "anonymous_method_expression"]
    }
}

impl SymbolExtractor for CSharp {
    fn extract_symbol(
        &self,
        node: Node,
        source: &str,
        parent_class: Option<&str>,
    ) -> Option<SymbolInfo> {
        let kind = match node.kind() {
            "class_declaration" | "struct_declaration" | "record_declaration" => SymbolKind::Class,
            "interface_declaration" => SymbolKind::Interface,
            "method_declaration" | "constructor_declaration" | "local_function_statement" => {
                symbols::function_kind(parent_class)
            }
            _ => return None,
        };
        let name = symbols::declared_name(node, source)?;
        let mut symbol = symbols::symbol_from_node(node, source, name, kind, parent_class);
        if matches!(node.kind(), "method_declaration" | "local_function_statement") {
            symbol.return_type = symbols::return_type(node, &["returns", "type"], source);
        }
        Some(symbol)
    }
}

impl ImportExtractor for CSharp {
    fn import_types(&self) -> &'static [&'static str] {
        &["using_directive"]
    }

    /// `using A.B;` and `using static A.B;` bring everything into scope (`*`);
    /// `using X = A.B;` binds the alias
    fn process_import_symbols(&self, node: Node, source: &str) -> Vec<ImportEntry> {
        let text = node_text(node, source).trim().trim_end_matches(';').trim();
        let text = text.strip_prefix("global").map_or(text, str::trim_start);
        let Some(body) = text.strip_prefix("using") else {
            return Vec::new();
        };
        let body = body.trim();
        let body = body.strip_prefix("static").map_or(body, str::trim_start);

        let (path, binding) = match body.split_once('=') {
            Some((alias, target)) => (target.trim(), alias.trim().to_string()),
            None => (body, "*".to_string()),
        };
        let path: String = path.split_whitespace().collect();
        if path.is_empty() {
            return Vec::new();
        }
        vec![ImportEntry::new(path, vec![binding])]
    }

    fn is_standard_library(&self, path: &str) -> bool {
        path.starts_with("System") || path.starts_with("Microsoft")
    }
}

impl ExportExtractor for CSharp {
    fn extract_exports(&self, root: Node, source: &str) -> Vec<String> {
        let mut exports = Vec::new();
        export_scope(root, source, &mut exports);
        exports
    }
}

/// Walk namespaces down to their public type declarations
fn export_scope(scope: Node, source: &str, exports: &mut Vec<String>) {
    for item in named_children(scope) {
        match item.kind() {
            "namespace_declaration" => {
                if let Some(body) = item.child_by_field_name("body") {
                    export_scope(body, source, exports);
                }
            }
            "file_scoped_namespace_declaration" => export_scope(item, source, exports),
            kind if is_type_declaration(kind) && has_modifier(item, source, "public") => {
                export_type(item, source, exports);
            }
            _ => {}
        }
    }
}

fn is_type_declaration(kind: &str) -> bool {
    TYPE_DECLARATIONS.contains(&kind) || kind == "enum_declaration"
}

fn export_type(declaration: Node, source: &str, exports: &mut Vec<String>) {
    symbols::export(exports, symbols::declared_name(declaration, source));
    let implicit = declaration.kind() == "interface_declaration";
    let Some(body) = declaration.child_by_field_name("body") else {
        return;
    };

    for member in named_children(body) {
        if !(implicit || has_modifier(member, source, "public")) {
            continue;
        }
        match member.kind() {
            "method_declaration" | "constructor_declaration" | "property_declaration"
            | "event_declaration" => {
                symbols::export(exports, symbols::declared_name(member, source));
            }
            "field_declaration" => {
                for declaration in named_children(member) {
                    if declaration.kind() != "variable_declaration" {
                        continue;
                    }
                    for declarator in named_children(declaration) {
                        if declarator.kind() == "variable_declarator" {
                            symbols::export(exports, symbols::declared_name(declarator, source));
                        }
                    }
                }
            }
            kind if is_type_declaration(kind) => export_type(member, source, exports),
            _ => {}
        }
    }
}

pub(super) fn definition() -> LanguageDefinition {
    LanguageDefinition {
        tag: "csharp",
        extensions: &["cs"],
        grammar: tree_sitter_c_sharp::LANGUAGE.into(),
        traverser: Box::new(CSharp),
        symbols: Box::new(CSharp),
        imports: Box::new(CSharp),
        exports: Box::new(CSharp),
        complexity: RULES,
        call_expression_types: &["invocation_expression", "object_creation_expression"],
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
        parser.set_language(&tree_sitter_c_sharp::LANGUAGE.into()).unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_using_forms() {
        let source = "using System;\nusing System.Collections.Generic;\nusing Microsoft.Extensions.Logging;\nusing Acme.Billing;\nusing static Acme.Math.Helpers;\nusing Json = Newtonsoft.Json;\nglobal using Acme.Core;\n";
        let tree = parse(source);
        let map = CSharp.extract_imports(tree.root_node(), source).symbol_map();
        let expected: BTreeMap<String, Vec<String>> = [
            ("Acme.Billing", vec!["*"]),
            ("Acme.Math.Helpers", vec!["*"]),
            ("Newtonsoft.Json", vec!["Json"]),
            ("Acme.Core", vec!["*"]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
        .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_public_exports_through_namespaces() {
        let source = r"namespace Acme.Shop
{
    public class Cart
    {
        public decimal Total { get; set; }
        public void Add(Item item) {}
        private void Recalculate() {}
    }

    internal class Pricing
    {
        public void Apply() {}
    }

    public interface ICheckout
    {
        void Pay();
    }
}
";
        let tree = parse(source);
        assert_eq!(
            CSharp.extract_exports(tree.root_node(), source),
            vec!["Cart", "Total", "Add", "ICheckout", "Pay"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_symbols_in_file_scoped_namespace() {
        let source = "namespace Acme;\n\npublic class Greeter\n{\n    public Greeter() {}\n    public string Greet(string name) { return name; }\n}\n";
        let def = definition();
        let tree = parse(source);
        let summary: Vec<_> = extract_symbols(&def, tree.root_node(), source)
            .into_iter()
            .map(|s| (s.name, s.kind, s.parent_class))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Greeter".to_string(), SymbolKind::Class, None),
                ("Greeter".to_string(), SymbolKind::Method, Some("Greeter".to_string())),
                ("Greet".to_string(), SymbolKind::Method, Some("Greeter".to_string())),
            ]
        );
    }
}
