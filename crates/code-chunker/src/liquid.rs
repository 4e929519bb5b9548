//! Regex-driven chunking for Liquid templates.
//!
//! `{% schema %}`, `{% style %}` and `{% javascript %}` blocks become atomic
//! `block` chunks; everything else is template text whose `render`, `include`
//! and `section` tags are collected as imports.

use crate::config::ChunkingOptions;
use crate::splitter::{line_windows, slice_lines, uncovered_runs};
use crate::types::{push_unique, AstChunk, ChunkMetadata, ChunkType, SymbolType};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::OnceLock;

/// Language tag and file extension of Liquid templates
pub const LIQUID_TAG: &str = "liquid";

fn block_open_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{%-?\s*(schema|style|javascript)\s*-?%\}").ok())
        .as_ref()
}

fn block_close_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{%-?\s*end(schema|style|javascript)\s*-?%\}").ok())
        .as_ref()
}

fn reference_tag_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{%-?\s*(?:render|include|section)\s+['"]([^'"]+)['"]"#).ok()
    })
    .as_ref()
}

fn comment_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\{%-?\s*comment\s*-?%\}.*?(?:\{%-?\s*endcomment\s*-?%\}|\z)").ok()
    })
    .as_ref()
}

/// A closed schema/style/javascript block
#[derive(Debug, Clone, PartialEq, Eq)]
struct TemplateBlock {
    kind: SymbolType,
    span: Range<usize>,
    start_line: usize,
    end_line: usize,
    name: Option<String>,
}

/// Chunk a Liquid template
///
/// Never fails: unclosed or mismatched blocks and invalid schema JSON fall
/// back to template text or an unnamed block. Tags inside `{% comment %}`
/// neither open blocks nor count as references.
#[must_use]
pub fn chunk_liquid(content: &str, file: &str, options: &ChunkingOptions) -> Vec<AstChunk> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    let comments: Vec<Range<usize>> = comment_regex()
        .map(|re| re.find_iter(content).map(|m| m.range()).collect())
        .unwrap_or_default();
    let blocks = find_blocks(content, &comments);
    let spans: Vec<Range<usize>> = blocks.iter().map(|block| block.span.clone()).collect();
    let outside = mask(content, &spans);
    let visible = mask(&outside, &comments);

    let lines: Vec<&str> = content.lines().collect();
    let outside_lines: Vec<&str> = outside.lines().collect();
    let mut covered = vec![false; lines.len()];
    let mut chunks = Vec::new();

    for block in blocks {
        // a line keeps template text when anything outside the block remains on it
        for line in block.start_line..=block.end_line {
            let bare = outside_lines
                .get(line - 1)
                .map_or(true, |text| text.trim().is_empty());
            if let (true, Some(flag)) = (bare, covered.get_mut(line - 1)) {
                *flag = true;
            }
        }

        for (start, end) in line_windows(block.start_line, block.end_line, options) {
            let mut metadata = ChunkMetadata::new(file, LIQUID_TAG, ChunkType::Block, start, end)
                .symbol_type(block.kind);
            metadata.symbol_name.clone_from(&block.name);
            chunks.push(AstChunk::new(slice_lines(&lines, start, end), metadata));
        }
    }

    let references = references(&visible);
    for (run_start, run_end) in uncovered_runs(&lines, &covered) {
        let mut imports = Vec::new();
        for (line, name) in &references {
            if (run_start..=run_end).contains(line) {
                push_unique(&mut imports, name.clone());
            }
        }

        for (start, end) in line_windows(run_start, run_end, options) {
            let mut metadata =
                ChunkMetadata::new(file, LIQUID_TAG, ChunkType::Template, start, end);
            if !imports.is_empty() {
                metadata.imports = Some(imports.clone());
            }
            chunks.push(AstChunk::new(slice_lines(&lines, start, end), metadata));
        }
    }

    chunks.sort_by_key(|chunk| chunk.metadata.start_line);
    chunks
}

/// Pair each opening tag with the first closing tag after it, skipping
/// tags that sit inside comments
fn find_blocks(content: &str, comments: &[Range<usize>]) -> Vec<TemplateBlock> {
    let (Some(open_re), Some(close_re)) = (block_open_regex(), block_close_regex()) else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    let mut offset = 0;

    while let Some(open) = next_outside(open_re, content, offset, comments) {
        let (Some(opener), Some(open_kind)) = (open.get(0), open.get(1)) else {
            break;
        };
        offset = opener.end();

        let Some(close) = next_outside(close_re, content, opener.end(), comments) else {
            log::debug!(
                "unclosed {{% {} %}} at line {}; treating as text",
                open_kind.as_str(),
                line_at(content, opener.start())
            );
            continue;
        };
        let (Some(closer), Some(close_kind)) = (close.get(0), close.get(1)) else {
            break;
        };

        if close_kind.as_str() != open_kind.as_str() {
            log::debug!(
                "{{% {} %}} at line {} closed by {{% end{} %}}; treating as text",
                open_kind.as_str(),
                line_at(content, opener.start()),
                close_kind.as_str()
            );
            continue;
        }

        let kind = match open_kind.as_str() {
            "schema" => SymbolType::Schema,
            "style" => SymbolType::Style,
            _ => SymbolType::Javascript,
        };
        let name = (kind == SymbolType::Schema)
            .then(|| schema_name(&content[opener.end()..closer.start()]))
            .flatten();

        blocks.push(TemplateBlock {
            kind,
            span: opener.start()..closer.end(),
            start_line: line_at(content, opener.start()),
            end_line: line_at(content, closer.end()),
            name,
        });
        offset = closer.end();
    }

    blocks
}

/// First match at or after `at` that does not start inside a comment
fn next_outside<'h>(
    re: &Regex,
    haystack: &'h str,
    mut at: usize,
    comments: &[Range<usize>],
) -> Option<Captures<'h>> {
    loop {
        let captures = re.captures_at(haystack, at)?;
        let start = captures.get(0)?.start();
        match comments.iter().find(|span| span.contains(&start)) {
            Some(span) => at = span.end,
            None => return Some(captures),
        }
    }
}

/// Blank out `spans` while keeping byte offsets and line breaks
fn mask(text: &str, spans: &[Range<usize>]) -> String {
    let mut bytes = text.as_bytes().to_vec();
    for span in spans {
        if let Some(region) = bytes.get_mut(span.clone()) {
            for byte in region.iter_mut().filter(|byte| **byte != b'\n') {
                *byte = b' ';
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// `name` of a schema body, if it is a JSON object with a string name
fn schema_name(body: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(body.trim()) {
        Ok(schema) => schema
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        Err(e) => {
            log::debug!("schema block is not valid JSON: {e}");
            None
        }
    }
}

/// Line and target of every render/include/section tag, in source order
fn references(visible: &str) -> Vec<(usize, String)> {
    let Some(reference_re) = reference_tag_regex() else {
        return Vec::new();
    };
    reference_re
        .captures_iter(visible)
        .filter_map(|captures| {
            let tag = captures.get(0)?;
            let name = captures.get(1)?;
            Some((line_at(visible, tag.start()), name.as_str().to_string()))
        })
        .collect()
}

/// 1-indexed line of a byte offset
fn line_at(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset.min(content.len())]
        .iter()
        .filter(|&&byte| byte == b'\n')
        .count()
        + 1
}
