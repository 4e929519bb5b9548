//! # Codelens Chunker
//!
//! AST-aware code chunking for semantic search and retrieval.
//!
//! ## Philosophy
//!
//! Every chunk is a unit a reader would recognise: a class, a method, a
//! function, or the top-level code between them. Each chunk carries the
//! file's imports, the names the file exports, the calls it makes and
//! complexity scores for the symbol it holds.
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Language lookup (extension → LanguageDefinition)
//!     │
//!     ├──> Tree-sitter parsing → AST          (.liquid: regex block scan)
//!     │
//!     ├──> Traversal
//!     │    ├─> Targets, containers, pass-through nodes
//!     │    ├─> Functions bound through declarations
//!     │    └─> Cyclomatic / cognitive / Halstead per symbol
//!     │
//!     └──> Chunk generation
//!          ├─> Symbol chunks (oversized ones split into overlapping windows)
//!          ├─> Template chunks for uncovered lines
//!          └─> Imports, exports and call sites attached
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codelens_chunker::{Chunker, ChunkingOptions};
//!
//! let chunker = Chunker::new(ChunkingOptions::default()).unwrap();
//!
//! let code = r#"
//! fn process_data(input: &str) -> String {
//!     let cleaned = input.trim();
//!     cleaned.to_uppercase()
//! }
//! "#;
//!
//! let chunks = chunker.chunk_str(code, "example.rs").unwrap();
//! for chunk in chunks {
//!     println!(
//!         "Chunk at lines {}-{}: {}",
//!         chunk.start_line(),
//!         chunk.end_line(),
//!         chunk.metadata.symbol_name.unwrap_or_default()
//!     );
//! }
//! ```

mod calls;
mod chunker;
pub mod complexity;
mod config;
mod error;
pub mod languages;
mod liquid;
mod splitter;
pub mod symbols;
mod traversal;
mod types;

pub use calls::{extract_call_sites, extract_call_sites_any};
pub use chunker::{chunk_tree, Chunker, ChunkingStats};
pub use config::ChunkingOptions;
pub use error::{ChunkerError, Result};
pub use languages::{
    all_call_expression_types, get_all_languages, get_language, language_for_extension,
    language_for_path, ExportExtractor, ImportExtractor, LanguageDefinition, LanguageTraverser,
    SymbolExtractor,
};
pub use liquid::{chunk_liquid, LIQUID_TAG};
pub use traversal::{extract_symbols, find_wrapped_function, WrappedFunction, MAX_WRAP_DEPTH};
pub use types::{
    AstChunk, CallSite, ChunkMetadata, ChunkType, FileImports, HalsteadMetrics, ImportEntry,
    SymbolInfo, SymbolKind, SymbolType,
};
