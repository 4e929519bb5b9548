use super::{
    ExportExtractor, ImportExtractor, LanguageDefinition, LanguageTraverser, SymbolExtractor,
};
use crate::complexity::{ComplexityRules, C_FAMILY_OPERATORS};
use crate::symbols::{self, has_modifier, named_children, node_text};
use crate::types::{ImportEntry, SymbolInfo, SymbolKind};
use tree_sitter::Node;

const TYPE_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

const RULES: ComplexityRules = ComplexityRules {
    decision_points: &[
        "if_statement",
        "for_statement",
        "enhanced_for_statement",
        "while_statement",
        "do_statement",
        "catch_clause",
        "ternary_expression",
        "switch_label",
        "&&",
        "||",
    ],
    nesting_types: &[
        "if_statement",
        "for_statement",
        "enhanced_for_statement",
        "while_statement",
        "do_statement",
        "catch_clause",
        "switch_expression",
    ],
    non_nesting_types: &["else", "ternary_expression", "switch_label"],
    operator_symbols: C_FAMILY_OPERATORS,
    operator_keywords: &[
        "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
        "return", "throw", "try", "catch", "finally", "new", "instanceof", "class", "interface",
        "enum", "extends", "implements", "static", "final", "public", "private", "protected",
        "synchronized", "void",
    ],
    atomic_operand_types: &["string_literal", "character_literal", "text_block"],
};

#[derive(Debug, Clone, Copy, Default)]
struct Java;

impl LanguageTraverser for Java {
    fn target_types(&self) -> &'static [&'static str] {
        &[
            "class_declaration",
            "interface_declaration",
            "enum_declaration",
            "record_declaration",
            "method_declaration",
            "constructor_declaration",
        ]
    }

    fn container_types(&self) -> &'static [&'static str] {
        TYPE_DECLARATIONS
    }

    fn declaration_types(&self) -> &'static [&'static str] {
        &["field_declaration"]
    }

    fn pass_through_types(&self) -> &'static [&'static str] {
        &["program", "enum_body_declarations"]
    }

    fn function_value_types(&self) -> &'static [&'static str] {
        &["lambda_expression"]
    }
}

impl SymbolExtractor for Java {
    fn extract_symbol(
        &self,
        node: Node,
        source: &str,
        parent_class: Option<&str>,
    ) -> Option<SymbolInfo> {
        let kind = match node.kind() {
            "class_declaration" | "enum_declaration" | "record_declaration" => SymbolKind::Class,
            "interface_declaration" => SymbolKind::Interface,
            "method_declaration" | "constructor_declaration" => {
                symbols::function_kind(parent_class)
            }
            _ => return None,
        };
        let name = symbols::declared_name(node, source)?;
        let mut symbol = symbols::symbol_from_node(node, source, name, kind, parent_class);
        if node.kind() == "method_declaration" {
            symbol.return_type = symbols::return_type(node, &["type"], source);
        }
        Some(symbol)
    }
}

impl ImportExtractor for Java {
    fn import_types(&self) -> &'static [&'static str] {
        &["import_declaration"]
    }

    /// `import a.b.C;` → (`a.b`, `C`), `import a.b.*;` → (`a.b`, `*`),
    /// `import static a.B.m;` → (`a.B`, `m`)
    fn process_import_symbols(&self, node: Node, source: &str) -> Vec<ImportEntry> {
        let text = node_text(node, source);
        let body = text
            .trim()
            .trim_start_matches("import")
            .trim_end_matches(';')
            .trim();
        let body = body.strip_prefix("static").map_or(body, str::trim);
        let qualified: String = body.split_whitespace().collect();

        match qualified.rsplit_once('.') {
            Some((path, item)) if !path.is_empty() && !item.is_empty() => {
                vec![ImportEntry::new(path, vec![item.to_string()])]
            }
            _ if !qualified.is_empty() => vec![ImportEntry::new(qualified.clone(), vec![qualified])],
            _ => Vec::new(),
        }
    }

    fn is_standard_library(&self, path: &str) -> bool {
        path.starts_with("java.") || path.starts_with("javax.") || path == "java" || path == "javax"
    }
}

impl ExportExtractor for Java {
    fn extract_exports(&self, root: Node, source: &str) -> Vec<String> {
        let mut exports = Vec::new();
        for item in named_children(root) {
            if TYPE_DECLARATIONS.contains(&item.kind()) && has_modifier(item, source, "public") {
                export_type(item, source, &mut exports);
            }
        }
        exports
    }
}

/// Export a public type and its public members; interface members are
/// implicitly public
fn export_type(declaration: Node, source: &str, exports: &mut Vec<String>) {
    symbols::export(exports, symbols::declared_name(declaration, source));
    let implicit = declaration.kind() == "interface_declaration";
    let Some(body) = declaration.child_by_field_name("body") else {
        return;
    };

    let mut members = named_children(body);
    if let Some(extra) = members
        .iter()
        .position(|member| member.kind() == "enum_body_declarations")
    {
        let declarations = members.remove(extra);
        members.extend(named_children(declarations));
    }

    for member in members {
        let public = implicit || has_modifier(member, source, "public");
        if !public {
            continue;
        }
        match member.kind() {
            "method_declaration" | "constructor_declaration" => {
                symbols::export(exports, symbols::declared_name(member, source));
            }
            "field_declaration" | "constant_declaration" => {
                for declarator in named_children(member) {
                    if declarator.kind() == "variable_declarator" {
                        symbols::export(exports, symbols::declared_name(declarator, source));
                    }
                }
            }
            kind if TYPE_DECLARATIONS.contains(&kind) => export_type(member, source, exports),
            _ => {}
        }
    }
}

pub(super) fn definition() -> LanguageDefinition {
    LanguageDefinition {
        tag: "java",
        extensions: &["java"],
        grammar: tree_sitter_java::LANGUAGE.into(),
        traverser: Box::new(Java),
        symbols: Box::new(Java),
        imports: Box::new(Java),
        exports: Box::new(Java),
        complexity: RULES,
        call_expression_types: &["method_invocation", "object_creation_expression"],
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
        parser.set_language(&tree_sitter_java::LANGUAGE.into()).unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_imports() {
        let source = "package app;\n\nimport java.util.List;\nimport javax.inject.Inject;\nimport com.acme.model.User;\nimport com.acme.model.Role;\nimport com.acme.util.*;\nimport static org.junit.Assert.assertEquals;\n";
        let tree = parse(source);
        let map = Java.extract_imports(tree.root_node(), source).symbol_map();
        let expected: BTreeMap<String, Vec<String>> = [
            ("com.acme.model", vec!["User", "Role"]),
            ("com.acme.util", vec!["*"]),
            ("org.junit.Assert", vec!["assertEquals"]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
        .collect();
        assert_eq!(map, expected);
    }

    #[test]
    fn test_public_modifier_required() {
        let source = r"public class Account {
    public static final int LIMIT = 5;
    private int balance;

    public Account() {}
    public int getBalance() { return balance; }
    void audit() {}

    public enum State { OPEN, CLOSED }
}

class Helper {
    public void run() {}
}

public interface Ledger {
    void post(int amount);
}
";
        let tree = parse(source);
        assert_eq!(
            Java.extract_exports(tree.root_node(), source),
            vec!["Account", "LIMIT", "getBalance", "State", "Ledger", "post"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_members_and_lambda_fields() {
        let source = "class Service {\n  private Runnable task = () -> {};\n  Service() {}\n  String name() { return \"s\"; }\n}\n";
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
                ("Service", SymbolKind::Class, None),
                ("task", SymbolKind::Method, Some("Service")),
                ("Service", SymbolKind::Method, Some("Service")),
                ("name", SymbolKind::Method, Some("Service")),
            ]
        );
        assert_eq!(symbols[3].return_type.as_deref(), Some("String"));
    }
}
