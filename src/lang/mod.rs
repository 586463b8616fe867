//! Language registry: grammar handles plus capture query documents.
//!
//! Each supported language contributes a [`LanguageConfig`] pairing a
//! tree-sitter grammar with a static query document whose captures are
//! named `category.kind.role` (e.g. `symbol.class.def`, `rel.call`,
//! `mod.export`). The query text is configuration, not user input; a
//! missing or malformed query degrades to "no symbols for this file".

pub mod css;
pub mod go;
pub mod rust_lang;
pub mod typescript;

use tree_sitter::Language;

/// Grammar plus query configuration for one language.
pub struct LanguageConfig {
    /// Language identifier ("typescript", "css", ...).
    pub name: &'static str,
    /// File extensions handled, without the dot.
    pub extensions: &'static [&'static str],
    language: fn() -> Language,
    query: fn() -> &'static str,
}

impl LanguageConfig {
    pub fn language(&self) -> Language {
        (self.language)()
    }

    /// The capture query document for this grammar.
    pub fn query_source(&self) -> &'static str {
        (self.query)()
    }
}

static CONFIGS: &[LanguageConfig] = &[
    LanguageConfig {
        name: "typescript",
        extensions: &["ts"],
        language: typescript::typescript_language,
        query: typescript::typescript_query,
    },
    LanguageConfig {
        name: "tsx",
        extensions: &["tsx", "js", "jsx"],
        language: typescript::tsx_language,
        query: typescript::tsx_query,
    },
    LanguageConfig {
        name: "css",
        extensions: &["css"],
        language: css::language,
        query: css::query,
    },
    LanguageConfig {
        name: "go",
        extensions: &["go"],
        language: go::language,
        query: go::query,
    },
    LanguageConfig {
        name: "rust",
        extensions: &["rs"],
        language: rust_lang::language,
        query: rust_lang::query,
    },
];

/// All registered language configurations.
pub fn all() -> &'static [LanguageConfig] {
    CONFIGS
}

/// Look up the language for a path by its extension.
pub fn for_path(path: &str) -> Option<&'static LanguageConfig> {
    let ext = path.rsplit('.').next().filter(|e| *e != path)?;
    CONFIGS.iter().find(|c| c.extensions.contains(&ext))
}

/// True when some registered grammar handles the extension (no dot).
pub fn is_supported(ext: &str) -> bool {
    CONFIGS.iter().any(|c| c.extensions.contains(&ext))
}
