use thiserror::Error;

/// Result alias used across the chunker
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur during code chunking
///
/// Only genuinely unusable inputs surface as errors. Malformed source (bad
/// schema JSON, unterminated blocks, nameless declarations) degrades to
/// template text instead.
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// No language is registered for the tag or extension
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The parser produced no tree
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid chunking options
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tree-sitter rejected the grammar
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl ChunkerError {
    /// Parser returned no tree
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Tag or extension with no registered grammar
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Rejected [`crate::ChunkingOptions`]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Grammar could not be loaded into the parser
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }
}
