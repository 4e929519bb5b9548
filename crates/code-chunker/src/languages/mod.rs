//! Per-language strategies behind one uniform interface.
//!
//! Every supported language contributes a [`LanguageDefinition`] composed of
//! four capabilities:
//!
//! - [`LanguageTraverser`] classifies node kinds (target / container /
//!   declaration / pass-through) for the shared traversal driver
//! - [`SymbolExtractor`] turns a boundary node into a [`SymbolInfo`]
//! - [`ImportExtractor`] maps import statements to paths and symbols
//! - [`ExportExtractor`] applies the language's visibility convention
//!
//! plus a [`ComplexityRules`] vocabulary and the node kinds that count as
//! call expressions.

mod csharp;
mod go;
mod java;
mod javascript;
mod php;
mod python;
mod registry;
mod rust;
mod typescript;

pub use registry::{
    all_call_expression_types, get_all_languages, get_language, language_for_extension,
    language_for_path,
};

use crate::complexity::ComplexityRules;
use crate::symbols;
use crate::traversal::{self, WrappedFunction};
use crate::types::{FileImports, ImportEntry, SymbolInfo};
use tree_sitter::Node;

/// Node classification consumed by the traversal driver
pub trait LanguageTraverser: Send + Sync {
    /// Kinds that become symbol boundaries
    fn target_types(&self) -> &'static [&'static str];

    /// Kinds whose body holds member symbols
    fn container_types(&self) -> &'static [&'static str];

    /// Kinds that may bind an anonymous function value
    fn declaration_types(&self) -> &'static [&'static str] {
        &[]
    }

    /// Kinds traversed without producing a boundary
    fn pass_through_types(&self) -> &'static [&'static str];

    /// Function-value kinds a declaration may wrap
    fn function_value_types(&self) -> &'static [&'static str] {
        &[]
    }

    fn is_target(&self, node: Node) -> bool {
        self.target_types().contains(&node.kind())
    }

    fn is_container(&self, node: Node) -> bool {
        self.container_types().contains(&node.kind())
    }

    fn is_declaration(&self, node: Node) -> bool {
        self.declaration_types().contains(&node.kind())
    }

    fn is_pass_through(&self, node: Node) -> bool {
        self.pass_through_types().contains(&node.kind())
    }

    /// Node whose named children are the container's members
    fn container_body<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        node.child_by_field_name("body")
    }

    /// Name attached as `parent_class` to the container's members
    fn container_name(&self, node: Node, source: &str) -> Option<String> {
        symbols::field_text(node, "name", source)
    }

    /// Bounded search for a bound function value inside a declaration
    fn find_wrapped_function<'t>(
        &self,
        declaration: Node<'t>,
        source: &str,
    ) -> Option<WrappedFunction<'t>> {
        traversal::find_wrapped_function(declaration, source, self.function_value_types())
    }
}

/// Builds symbol info for boundary nodes
pub trait SymbolExtractor: Send + Sync {
    /// Returns `None` when the node has no resolvable name
    fn extract_symbol(
        &self,
        node: Node,
        source: &str,
        parent_class: Option<&str>,
    ) -> Option<SymbolInfo>;
}

/// Maps import statements to `{path, symbols}`
pub trait ImportExtractor: Send + Sync {
    /// Kinds inspected as potential import statements
    fn import_types(&self) -> &'static [&'static str];

    /// All entries of one import statement, standard library included
    fn process_import_symbols(&self, node: Node, source: &str) -> Vec<ImportEntry>;

    /// Standard-library paths are dropped from results
    fn is_standard_library(&self, _path: &str) -> bool {
        false
    }

    /// First non-standard-library path of an import statement
    fn extract_import_path(&self, node: Node, source: &str) -> Option<String> {
        self.process_import_symbols(node, source)
            .into_iter()
            .map(|entry| entry.path)
            .find(|path| !self.is_standard_library(path))
    }

    /// Collect every import of the file in source order
    fn extract_imports(&self, root: Node, source: &str) -> FileImports {
        let mut imports = FileImports::default();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if self.import_types().contains(&node.kind()) {
                let entries = self.process_import_symbols(node, source);
                if !entries.is_empty() {
                    for entry in entries {
                        if !self.is_standard_library(&entry.path) {
                            imports.insert(entry);
                        }
                    }
                    continue;
                }
            }

            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        imports
    }
}

/// Applies the language's export visibility rule
pub trait ExportExtractor: Send + Sync {
    /// Exported names, deduplicated in first-occurrence order
    fn extract_exports(&self, root: Node, source: &str) -> Vec<String>;

    /// Whether the symbol rooted at `node` is one of `exports`
    fn is_exported_symbol(&self, _node: Node, symbol: &SymbolInfo, exports: &[String]) -> bool {
        exports.contains(&symbol.name)
    }
}

/// Everything the chunker knows about one language
pub struct LanguageDefinition {
    pub tag: &'static str,
    pub extensions: &'static [&'static str],
    grammar: tree_sitter::Language,
    pub traverser: Box<dyn LanguageTraverser>,
    pub symbols: Box<dyn SymbolExtractor>,
    pub imports: Box<dyn ImportExtractor>,
    pub exports: Box<dyn ExportExtractor>,
    pub complexity: ComplexityRules,
    pub call_expression_types: &'static [&'static str],
}

impl LanguageDefinition {
    /// Tree-sitter grammar for this language
    #[must_use]
    pub fn grammar(&self) -> &tree_sitter::Language {
        &self.grammar
    }

    /// Whether `ext` (without the dot, any case) belongs to this language
    #[must_use]
    pub fn handles_extension(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}

impl std::fmt::Debug for LanguageDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageDefinition")
            .field("tag", &self.tag)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}
