use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_CHUNK_SIZE: usize = 75;
const DEFAULT_CHUNK_OVERLAP: usize = 10;
const MAX_CHUNK_SIZE: usize = 10_000;

/// A block is only split once it spans more than this many chunk sizes.
pub const SPLIT_FACTOR: usize = 3;

/// Line-based chunking options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChunkingOptions {
    /// Window size in lines for split blocks
    pub chunk_size: usize,

    /// Lines shared between consecutive windows
    pub chunk_overlap: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingOptions {
    /// Create options with explicit sizes
    #[must_use]
    pub const fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Line count above which a block gets split into windows
    #[must_use]
    pub const fn split_threshold(&self) -> usize {
        self.chunk_size.saturating_mul(SPLIT_FACTOR)
    }

    /// Distance between the first lines of consecutive windows
    #[must_use]
    pub fn window_step(&self) -> usize {
        self.chunk_size.saturating_sub(self.chunk_overlap).max(1)
    }

    /// Validate options
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkerError::invalid_config("chunk_size must be > 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ChunkerError::invalid_config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(())
    }

    /// Parse options from a TOML document; missing keys keep their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let options: Self = toml::from_str(raw)
            .map_err(|e| ChunkerError::invalid_config(format!("Invalid options TOML: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    /// Read options from `CODELENS_CHUNK_SIZE` / `CODELENS_CHUNK_OVERLAP`
    #[must_use]
    pub fn from_env() -> Self {
        let size = std::env::var("CODELENS_CHUNK_SIZE").ok();
        let overlap = std::env::var("CODELENS_CHUNK_OVERLAP").ok();
        Self::from_raw(size.as_deref(), overlap.as_deref())
    }

    fn from_raw(size: Option<&str>, overlap: Option<&str>) -> Self {
        let chunk_size = parse_lines(size, DEFAULT_CHUNK_SIZE).clamp(1, MAX_CHUNK_SIZE);
        let chunk_overlap = parse_lines(overlap, DEFAULT_CHUNK_OVERLAP);
        let options = Self::new(chunk_size, chunk_overlap);
        if options.validate().is_ok() {
            return options;
        }

        log::warn!(
            "Ignoring chunk_overlap={chunk_overlap} (chunk_size={chunk_size}); using no overlap"
        );
        Self::new(chunk_size, 0)
    }
}

fn parse_lines(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_options_valid() {
        let options = ChunkingOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.chunk_size, 75);
        assert_eq!(options.chunk_overlap, 10);
        assert_eq!(options.split_threshold(), 225);
        assert_eq!(options.window_step(), 65);
    }

    #[test]
    fn test_options_validation() {
        assert!(ChunkingOptions::new(0, 0).validate().is_err());
        assert!(ChunkingOptions::new(10, 10).validate().is_err());
        assert!(ChunkingOptions::new(10, 9).validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let options = ChunkingOptions::from_toml_str("chunkSize = 40").unwrap();
        assert_eq!(options, ChunkingOptions::new(40, 10));

        assert!(ChunkingOptions::from_toml_str("chunkSize = 5\nchunkOverlap = 6").is_err());
        assert!(ChunkingOptions::from_toml_str("chunkSize = \"big\"").is_err());
    }

    #[test]
    fn test_from_raw_env_values() {
        assert_eq!(ChunkingOptions::from_raw(None, None), ChunkingOptions::default());
        assert_eq!(
            ChunkingOptions::from_raw(Some(" 50 "), Some("5")),
            ChunkingOptions::new(50, 5)
        );
        assert_eq!(
            ChunkingOptions::from_raw(Some("nope"), Some("")),
            ChunkingOptions::default()
        );
        assert_eq!(ChunkingOptions::from_raw(Some("0"), None), ChunkingOptions::new(1, 0));
        assert_eq!(
            ChunkingOptions::from_raw(Some("8"), Some("20")),
            ChunkingOptions::new(8, 0)
        );
    }
}
