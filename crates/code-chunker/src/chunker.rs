use crate::calls;
use crate::complexity;
use crate::config::ChunkingOptions;
use crate::error::{ChunkerError, Result};
use crate::languages::{get_language, language_for_path, LanguageDefinition};
use crate::liquid::{self, LIQUID_TAG};
use crate::splitter::{line_windows, slice_lines, uncovered_runs};
use crate::traversal::collect_boundaries;
use crate::types::{AstChunk, ChunkMetadata, ChunkType, SymbolType};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Build the ordered chunk list of a parsed file
///
/// Every symbol becomes one chunk (or several overlapping windows when it is
/// oversized); lines outside all symbols become template chunks. File-wide
/// imports are attached to every chunk, exports to template chunks and to
/// symbol chunks whose name is exported.
#[must_use]
pub fn chunk_tree(
    def: &LanguageDefinition,
    root: Node,
    source: &str,
    file: &str,
    options: &ChunkingOptions,
) -> Vec<AstChunk> {
    if source.trim().is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = source.lines().collect();
    let imports = def.imports.extract_imports(root, source);
    let exports = def.exports.extract_exports(root, source);
    let boundaries = collect_boundaries(def, root, source);

    let mut covered = vec![false; lines.len()];
    let mut chunks = Vec::new();

    for boundary in &boundaries {
        let symbol = &boundary.symbol;
        let end_line = symbol.end_line.min(lines.len()).max(symbol.start_line);
        for line in symbol.start_line..=end_line {
            if let Some(flag) = covered.get_mut(line - 1) {
                *flag = true;
            }
        }

        let halstead = complexity::halstead(boundary.body, source, &def.complexity);
        let call_sites = calls::extract_call_sites(boundary.body, source, def.call_expression_types);
        let exported = def.exports.is_exported_symbol(boundary.body, symbol, &exports);
        let windows = line_windows(symbol.start_line, end_line, options);
        let split = windows.len() > 1;

        for (start, end) in windows {
            let mut metadata = ChunkMetadata::new(file, def.tag, symbol.kind.into(), start, end)
                .with_symbol(symbol)
                .with_halstead(&halstead)
                .with_imports(&imports);
            metadata.call_sites = Some(if split {
                call_sites
                    .iter()
                    .filter(|call| (start..=end).contains(&call.line))
                    .cloned()
                    .collect()
            } else {
                call_sites.clone()
            });
            if exported {
                metadata.exports = Some(exports.clone());
            }
            chunks.push(AstChunk::new(slice_lines(&lines, start, end), metadata));
        }
    }

    for (run_start, run_end) in uncovered_runs(&lines, &covered) {
        for (start, end) in line_windows(run_start, run_end, options) {
            let mut metadata = ChunkMetadata::new(file, def.tag, ChunkType::Template, start, end)
                .with_imports(&imports);
            if !exports.is_empty() {
                metadata.exports = Some(exports.clone());
            }
            chunks.push(AstChunk::new(slice_lines(&lines, start, end), metadata));
        }
    }

    chunks.sort_by_key(|chunk| chunk.metadata.start_line);

    log::trace!(
        "{file}: {} symbols, {} chunks, {} imports, {} exports",
        boundaries.len(),
        chunks.len(),
        imports.entries().len(),
        exports.len()
    );

    chunks
}

/// Parses and chunks raw source text
///
/// The language is picked from the file extension or an explicit tag;
/// `.liquid` files take the regex path.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    options: ChunkingOptions,
}

impl Chunker {
    /// Create a chunker; fails on invalid options
    pub fn new(options: ChunkingOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Chunk code, detecting the language from `file_path`
    pub fn chunk_str(&self, content: &str, file_path: &str) -> Result<Vec<AstChunk>> {
        let is_liquid = Path::new(file_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(LIQUID_TAG));
        if is_liquid {
            return Ok(liquid::chunk_liquid(content, file_path, &self.options));
        }

        let def = language_for_path(file_path)?;
        self.chunk_parsed(content, file_path, def)
    }

    /// Chunk code with an explicit language tag
    pub fn chunk_with_language(
        &self,
        content: &str,
        file_path: &str,
        tag: &str,
    ) -> Result<Vec<AstChunk>> {
        if tag.eq_ignore_ascii_case(LIQUID_TAG) {
            return Ok(liquid::chunk_liquid(content, file_path, &self.options));
        }

        let def = get_language(tag)?;
        self.chunk_parsed(content, file_path, def)
    }

    fn chunk_parsed(
        &self,
        content: &str,
        file_path: &str,
        def: &LanguageDefinition,
    ) -> Result<Vec<AstChunk>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut parser = Parser::new();
        parser
            .set_language(def.grammar())
            .map_err(|e| ChunkerError::tree_sitter(format!("Failed to set language: {e}")))?;
        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ChunkerError::parse("Failed to parse source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            log::warn!("{file_path}: syntax errors in {} source; chunking anyway", def.tag);
        }

        Ok(chunk_tree(def, root, content, file_path, &self.options))
    }

    /// Get chunking options
    #[must_use]
    pub const fn options(&self) -> &ChunkingOptions {
        &self.options
    }

    /// Get statistics about chunks
    #[must_use]
    pub fn get_stats(chunks: &[AstChunk]) -> ChunkingStats {
        let mut stats = ChunkingStats {
            total_chunks: chunks.len(),
            ..ChunkingStats::default()
        };

        for chunk in chunks {
            stats.total_lines += chunk.line_count();
            match chunk.metadata.chunk_type {
                ChunkType::Template => stats.template_chunks += 1,
                ChunkType::Block => stats.block_chunks += 1,
                _ => stats.symbol_chunks += 1,
            }
            if let Some(complexity) = chunk.metadata.complexity {
                stats.max_complexity = stats.max_complexity.max(complexity);
            }
            if chunk.metadata.symbol_type == Some(SymbolType::Schema) {
                stats.schema_blocks += 1;
            }
        }

        stats
    }
}

/// Statistics about chunking results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub symbol_chunks: usize,
    pub template_chunks: usize,
    pub block_chunks: usize,
    pub schema_blocks: usize,
    pub max_complexity: u32,
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Chunking Statistics:")?;
        writeln!(f, "  Total chunks: {}", self.total_chunks)?;
        writeln!(f, "  Total lines: {}", self.total_lines)?;
        writeln!(f, "  Symbol chunks: {}", self.symbol_chunks)?;
        writeln!(f, "  Template chunks: {}", self.template_chunks)?;
        writeln!(f, "  Block chunks: {}", self.block_chunks)?;
        write!(f, "  Max complexity: {}", self.max_complexity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_RUST: &str = r#"use std::collections::HashMap;
use crate::store::Store;

pub struct Cache {
    items: HashMap<String, String>,
}

impl Cache {
    pub fn get(&self, key: &str) -> Option<&String> {
        if key.is_empty() {
            return None;
        }
        self.items.get(key)
    }
}

fn helper() {}
"#;

    fn chunk(content: &str, file: &str) -> Vec<AstChunk> {
        Chunker::default().chunk_str(content, file).unwrap()
    }

    #[test]
    fn test_chunk_str() {
        let chunks = chunk(SAMPLE_RUST, "src/cache.rs");
        let summary: Vec<_> = chunks
            .iter()
            .map(|c| {
                (
                    c.metadata.chunk_type,
                    c.metadata.symbol_name.clone(),
                    c.start_line(),
                    c.end_line(),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                (ChunkType::Template, None, 1, 2),
                (ChunkType::Class, Some("Cache".to_string()), 4, 6),
                (ChunkType::Template, None, 8, 8),
                (ChunkType::Method, Some("get".to_string()), 9, 14),
                (ChunkType::Template, None, 15, 15),
                (ChunkType::Function, Some("helper".to_string()), 17, 17),
            ]
        );
    }

    #[test]
    fn test_symbol_chunk_metadata() {
        let chunks = chunk(SAMPLE_RUST, "src/cache.rs");
        let get = chunks
            .iter()
            .find(|c| c.metadata.symbol_name.as_deref() == Some("get"))
            .unwrap();

        assert_eq!(get.metadata.parent_class.as_deref(), Some("Cache"));
        assert_eq!(get.metadata.symbol_type, Some(SymbolType::Method));
        assert_eq!(get.metadata.complexity, Some(2));
        assert_eq!(get.metadata.return_type.as_deref(), Some("Option<&String>"));
        assert_eq!(
            get.metadata.imports.as_deref(),
            Some(&["crate::store".to_string()][..])
        );
        assert!(get.metadata.exports.as_ref().is_some_and(|e| e.contains(&"get".to_string())));
        assert!(get.metadata.halstead_volume.is_some_and(|v| v > 0.0));

        let calls: Vec<_> = get
            .metadata
            .call_sites
            .iter()
            .flatten()
            .map(|c| c.symbol.as_str())
            .collect();
        assert!(calls.contains(&"is_empty"));
        assert!(calls.contains(&"get"));

        let helper = chunks
            .iter()
            .find(|c| c.metadata.symbol_name.as_deref() == Some("helper"))
            .unwrap();
        assert_eq!(helper.metadata.exports, None);
    }

    #[test]
    fn test_empty_content_has_no_chunks() {
        assert!(chunk("", "a.rs").is_empty());
        assert!(chunk("   \n\n\t", "a.py").is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let result = Chunker::default().chunk_str("x", "notes.txt");
        assert!(matches!(result, Err(ChunkerError::UnsupportedLanguage(_))));
    }

    #[test]
    fn test_explicit_language_tag() {
        let chunks = Chunker::default()
            .chunk_with_language("def f():\n    pass\n", "script", "python")
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.language, "python");
        assert_eq!(chunks[0].metadata.symbol_name.as_deref(), Some("f"));
    }

    #[test]
    fn test_liquid_routing() {
        let chunks = chunk("{% schema %}{\"name\":\"Hero\"}{% endschema %}", "sections/hero.liquid");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.language, "liquid");
    }

    #[test]
    fn test_invalid_options_rejected() {
        assert!(Chunker::new(ChunkingOptions::new(10, 10)).is_err());
    }

    #[test]
    fn test_chunking_stats() {
        let chunks = chunk(SAMPLE_RUST, "src/cache.rs");
        let stats = Chunker::get_stats(&chunks);
        assert_eq!(stats.total_chunks, 6);
        assert_eq!(stats.symbol_chunks, 3);
        assert_eq!(stats.template_chunks, 3);
        assert_eq!(stats.max_complexity, 2);
    }
}
