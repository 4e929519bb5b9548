use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of an extracted symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Interface,
}

impl SymbolKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Interface => "interface",
        }
    }
}

/// Symbol type carried on a chunk: an AST symbol kind or a template block kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolType {
    Function,
    Method,
    Class,
    Interface,
    Schema,
    Style,
    Javascript,
}

impl SymbolType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Schema => "schema",
            Self::Style => "style",
            Self::Javascript => "javascript",
        }
    }
}

impl From<SymbolKind> for SymbolType {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Function => Self::Function,
            SymbolKind::Method => Self::Method,
            SymbolKind::Class => Self::Class,
            SymbolKind::Interface => Self::Interface,
        }
    }
}

/// Type of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    /// Text between symbols (or a whole file without symbols)
    Template,
    /// Atomic template block (schema/style/javascript)
    Block,
    Function,
    Method,
    Class,
    Interface,
}

impl ChunkType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Block => "block",
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Interface => "interface",
        }
    }

    /// Whether this chunk represents an extracted symbol
    #[must_use]
    pub const fn is_symbol(self) -> bool {
        matches!(
            self,
            Self::Function | Self::Method | Self::Class | Self::Interface
        )
    }
}

impl From<SymbolKind> for ChunkType {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Function => Self::Function,
            SymbolKind::Method => Self::Method,
            SymbolKind::Class => Self::Class,
            SymbolKind::Interface => Self::Interface,
        }
    }
}

/// A named program element with its line range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Enclosing class/impl/interface name for members
    pub parent_class: Option<String>,

    /// Declaration header, whitespace-collapsed
    pub signature: String,

    pub parameters: Vec<String>,
    pub return_type: Option<String>,

    /// Cyclomatic complexity
    pub complexity: u32,
    pub cognitive_complexity: u32,
}

impl SymbolInfo {
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// One import path and the names it brings into scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub path: String,
    pub symbols: Vec<String>,
}

impl ImportEntry {
    pub fn new(path: impl Into<String>, symbols: Vec<String>) -> Self {
        Self {
            path: path.into(),
            symbols,
        }
    }
}

/// All imports of a file, merged by path in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileImports {
    entries: Vec<ImportEntry>,
}

impl FileImports {
    /// Add an entry, merging symbols into an existing entry for the same path
    pub fn insert(&mut self, entry: ImportEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.path == entry.path) {
            for symbol in entry.symbols {
                push_unique(&mut existing.symbols, symbol);
            }
            return;
        }

        let mut symbols = Vec::with_capacity(entry.symbols.len());
        for symbol in entry.symbols {
            push_unique(&mut symbols, symbol);
        }
        self.entries.push(ImportEntry {
            path: entry.path,
            symbols,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[ImportEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Import paths in first-occurrence order
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    /// Import path → imported symbols
    #[must_use]
    pub fn symbol_map(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|e| (e.path.clone(), e.symbols.clone()))
            .collect()
    }
}

/// Software-science metrics of a symbol body
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalsteadMetrics {
    /// n1
    pub distinct_operators: usize,
    /// n2
    pub distinct_operands: usize,
    /// N1
    pub total_operators: usize,
    /// N2
    pub total_operands: usize,
    pub volume: f64,
    pub difficulty: f64,
    pub effort: f64,
    pub bugs: f64,
}

/// An outgoing call reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSite {
    pub symbol: String,
    /// 1-indexed line of the call
    pub line: usize,
}

/// A chunk of source with its structural metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstChunk {
    /// The source lines covered by this chunk
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl AstChunk {
    #[must_use]
    pub const fn new(content: String, metadata: ChunkMetadata) -> Self {
        Self { content, metadata }
    }

    #[must_use]
    pub const fn start_line(&self) -> usize {
        self.metadata.start_line
    }

    #[must_use]
    pub const fn end_line(&self) -> usize {
        self.metadata.end_line
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.metadata.end_line.saturating_sub(self.metadata.start_line) + 1
    }

    /// Check if chunk contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.metadata.start_line && line <= self.metadata.end_line
    }
}

/// Metadata about a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    pub file: String,
    pub start_line: usize,
    pub end_line: usize,

    #[serde(rename = "type")]
    pub chunk_type: ChunkType,

    pub language: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_type: Option<SymbolType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_class: Option<String>,

    /// Cyclomatic complexity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitive_complexity: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub halstead_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub halstead_difficulty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub halstead_effort: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub halstead_bugs: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,

    /// Import paths of the whole file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_symbols: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exports: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_sites: Option<Vec<CallSite>>,
}

impl ChunkMetadata {
    /// Metadata for a chunk with no symbol attached
    pub fn new(
        file: impl Into<String>,
        language: impl Into<String>,
        chunk_type: ChunkType,
        start_line: usize,
        end_line: usize,
    ) -> Self {
        Self {
            file: file.into(),
            start_line,
            end_line,
            chunk_type,
            language: language.into(),
            symbol_name: None,
            symbol_type: None,
            parent_class: None,
            complexity: None,
            cognitive_complexity: None,
            halstead_volume: None,
            halstead_difficulty: None,
            halstead_effort: None,
            halstead_bugs: None,
            parameters: None,
            signature: None,
            return_type: None,
            imports: None,
            imported_symbols: None,
            exports: None,
            call_sites: None,
        }
    }

    /// Builder: set symbol name
    #[must_use]
    pub fn symbol_name(mut self, name: impl Into<String>) -> Self {
        self.symbol_name = Some(name.into());
        self
    }

    /// Builder: set symbol type
    #[must_use]
    pub const fn symbol_type(mut self, symbol_type: SymbolType) -> Self {
        self.symbol_type = Some(symbol_type);
        self
    }

    /// Builder: attach symbol info
    #[must_use]
    pub fn with_symbol(mut self, symbol: &SymbolInfo) -> Self {
        self.symbol_name = Some(symbol.name.clone());
        self.symbol_type = Some(symbol.kind.into());
        self.parent_class.clone_from(&symbol.parent_class);
        self.complexity = Some(symbol.complexity);
        self.cognitive_complexity = Some(symbol.cognitive_complexity);
        self.parameters = Some(symbol.parameters.clone());
        self.signature = Some(symbol.signature.clone());
        self.return_type.clone_from(&symbol.return_type);
        self
    }

    /// Builder: attach Halstead metrics
    #[must_use]
    pub fn with_halstead(mut self, metrics: &HalsteadMetrics) -> Self {
        self.halstead_volume = Some(metrics.volume);
        self.halstead_difficulty = Some(metrics.difficulty);
        self.halstead_effort = Some(metrics.effort);
        self.halstead_bugs = Some(metrics.bugs);
        self
    }

    /// Builder: attach file-level imports (no-op when the file has none)
    #[must_use]
    pub fn with_imports(mut self, imports: &FileImports) -> Self {
        if !imports.is_empty() {
            self.imports = Some(imports.paths());
            self.imported_symbols = Some(imports.symbol_map());
        }
        self
    }
}

/// Push `value` unless it is already present
pub(crate) fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.iter().any(|existing| *existing == value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chunk_line_count() {
        let chunk = AstChunk::new(
            "code".to_string(),
            ChunkMetadata::new("test.rs", "rust", ChunkType::Template, 10, 15),
        );
        assert_eq!(chunk.line_count(), 6);
        assert!(chunk.contains_line(10));
        assert!(chunk.contains_line(15));
        assert!(!chunk.contains_line(9));
        assert!(!chunk.contains_line(16));
    }

    #[test]
    fn test_file_imports_merge_by_path() {
        let mut imports = FileImports::default();
        imports.insert(ImportEntry::new("./a", vec!["x".into(), "y".into()]));
        imports.insert(ImportEntry::new("./b", vec![]));
        imports.insert(ImportEntry::new("./a", vec!["y".into(), "z".into()]));

        assert_eq!(imports.paths(), vec!["./a".to_string(), "./b".to_string()]);
        assert_eq!(
            imports.symbol_map().get("./a"),
            Some(&vec!["x".to_string(), "y".to_string(), "z".to_string()])
        );
    }

    #[test]
    fn test_metadata_serializes_camel_case_without_nones() {
        let metadata = ChunkMetadata::new("a.liquid", "liquid", ChunkType::Block, 3, 6)
            .symbol_type(SymbolType::Schema);
        let json = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json["type"], "block");
        assert_eq!(json["symbolType"], "schema");
        assert_eq!(json["startLine"], 3);
        assert!(json.get("symbolName").is_none());
        assert!(json.get("imports").is_none());
    }
}
