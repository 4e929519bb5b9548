use super::{csharp, go, java, javascript, php, python, rust, typescript, LanguageDefinition};
use crate::error::{ChunkerError, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

fn registry() -> &'static [LanguageDefinition] {
    static REGISTRY: OnceLock<Vec<LanguageDefinition>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        vec![
            javascript::definition(),
            typescript::definition(),
            typescript::tsx_definition(),
            python::definition(),
            php::definition(),
            rust::definition(),
            go::definition(),
            java::definition(),
            csharp::definition(),
        ]
    })
}

/// Look up a language by tag (`"rust"`, `"typescript"`, ...)
pub fn get_language(tag: &str) -> Result<&'static LanguageDefinition> {
    registry()
        .iter()
        .find(|def| def.tag.eq_ignore_ascii_case(tag))
        .ok_or_else(|| ChunkerError::unsupported_language(tag))
}

/// Look up a language by file extension (without the dot)
pub fn language_for_extension(ext: &str) -> Result<&'static LanguageDefinition> {
    let ext = ext.trim_start_matches('.');
    registry()
        .iter()
        .find(|def| def.handles_extension(ext))
        .ok_or_else(|| ChunkerError::unsupported_language(ext))
}

/// Look up a language from a file path's extension
pub fn language_for_path(path: impl AsRef<Path>) -> Result<&'static LanguageDefinition> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| ChunkerError::unsupported_language(path.display().to_string()))?;
    language_for_extension(ext)
}

/// Every registered language
pub fn get_all_languages() -> &'static [LanguageDefinition] {
    registry()
}

/// Union of call-expression node kinds across all languages
pub fn all_call_expression_types() -> &'static HashSet<&'static str> {
    static CALL_TYPES: OnceLock<HashSet<&'static str>> = OnceLock::new();
    CALL_TYPES.get_or_init(|| {
        get_all_languages()
            .iter()
            .flat_map(|def| def.call_expression_types.iter().copied())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_language() {
        assert_eq!(get_language("rust").unwrap().tag, "rust");
        assert_eq!(get_language("TypeScript").unwrap().tag, "typescript");
        assert!(matches!(
            get_language("cobol"),
            Err(ChunkerError::UnsupportedLanguage(tag)) if tag == "cobol"
        ));
    }

    #[test]
    fn test_language_for_extension() {
        assert_eq!(language_for_extension("rs").unwrap().tag, "rust");
        assert_eq!(language_for_extension("PY").unwrap().tag, "python");
        assert_eq!(language_for_extension(".mjs").unwrap().tag, "javascript");
        assert_eq!(language_for_extension("tsx").unwrap().tag, "tsx");
        assert_eq!(language_for_extension("cs").unwrap().tag, "csharp");
        assert!(language_for_extension("liquid").is_err());
    }

    #[test]
    fn test_language_for_path() {
        assert_eq!(language_for_path("src/main.go").unwrap().tag, "go");
        assert_eq!(language_for_path("app/Models/User.php").unwrap().tag, "php");
        assert!(language_for_path("Makefile").is_err());
    }

    #[test]
    fn test_tags_and_extensions_are_unique() {
        let mut tags = HashSet::new();
        let mut extensions = HashSet::new();
        for def in get_all_languages() {
            assert!(tags.insert(def.tag), "duplicate tag {}", def.tag);
            for ext in def.extensions {
                assert!(extensions.insert(*ext), "duplicate extension {ext}");
            }
        }
    }

    #[test]
    fn test_grammars_load() {
        for def in get_all_languages() {
            let mut parser = tree_sitter::Parser::new();
            assert!(
                parser.set_language(def.grammar()).is_ok(),
                "grammar for {} failed to load",
                def.tag
            );
        }
    }

    #[test]
    fn test_call_expression_union_is_memoized() {
        let first = all_call_expression_types();
        let second = all_call_expression_types();
        assert!(std::ptr::eq(first, second));
        for kind in ["call_expression", "call", "macro_invocation", "method_invocation"] {
            assert!(first.contains(kind), "missing {kind}");
        }
        assert!(first.contains("invocation_expression"));
        assert!(first.contains("member_call_expression"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_types_are_send_and_sync() {
        assert_send_sync::<LanguageDefinition>();
        assert_send_sync::<&'static LanguageDefinition>();
        assert_send_sync::<crate::chunker::Chunker>();
        assert_send_sync::<crate::types::AstChunk>();
        assert_send_sync::<crate::config::ChunkingOptions>();
    }
}
