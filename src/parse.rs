//! Tree-sitter parsing and query compilation.
//!
//! Queries are compiled once per language and cached; at compile time each
//! capture name is resolved into a [`CaptureKind`] descriptor, so the
//! analyzer indexes a table instead of re-splitting `category.kind.role`
//! strings for every capture.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser as TsParser, Query, QueryCursor, Tree};

use crate::lang::LanguageConfig;
use crate::model::{RelationshipKind, SymbolKind};
use crate::span::{Pos, Range};

/// Which flag a `mod.*` capture mutates on its enclosing symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModKind {
    Export,
    Static,
    Abstract,
    Readonly,
    Async,
    Accessibility,
}

/// Resolved meaning of one capture name in a compiled query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// `symbol.<kind>.def`: creates a symbol.
    SymbolDef(SymbolKind),
    /// `rel.<kind>[.role]`: records a relationship.
    Rel(RelationshipKind),
    /// `mod.<kind>`: mutates the nearest enclosing symbol.
    Modifier(ModKind),
    /// Helper captures (`@_fn`), scope markers, unknown kinds.
    Other,
}

/// A compiled query plus its capture descriptor table, indexed by the
/// query's capture id.
pub struct CompiledQuery {
    pub query: Query,
    pub kinds: Vec<CaptureKind>,
}

fn capture_kind(name: &str) -> CaptureKind {
    if name.starts_with('_') {
        return CaptureKind::Other;
    }
    let mut parts = name.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("symbol"), Some(kind), Some("def")) => SymbolKind::parse(kind)
            .map(CaptureKind::SymbolDef)
            .unwrap_or(CaptureKind::Other),
        (Some("rel"), Some(kind), _) => RelationshipKind::parse(kind)
            .map(CaptureKind::Rel)
            .unwrap_or(CaptureKind::Other),
        (Some("mod"), Some(kind), None) => match kind {
            "export" => CaptureKind::Modifier(ModKind::Export),
            "static" => CaptureKind::Modifier(ModKind::Static),
            "abstract" => CaptureKind::Modifier(ModKind::Abstract),
            "readonly" => CaptureKind::Modifier(ModKind::Readonly),
            "async" => CaptureKind::Modifier(ModKind::Async),
            "accessibility" => CaptureKind::Modifier(ModKind::Accessibility),
            _ => CaptureKind::Other,
        },
        _ => CaptureKind::Other,
    }
}

lazy_static! {
    /// Compiled queries keyed by language name. A `None` entry records a
    /// query that failed to compile so we warn only once.
    static ref QUERY_CACHE: RwLock<HashMap<&'static str, Option<Arc<CompiledQuery>>>> =
        RwLock::new(HashMap::new());
}

/// Get the compiled query for a language.
///
/// A missing or malformed query yields `None`: the file is analyzed as
/// having no symbols, which is not an error.
pub fn compiled_query(lang: &'static LanguageConfig) -> Option<Arc<CompiledQuery>> {
    {
        let cache = QUERY_CACHE.read().unwrap();
        if let Some(entry) = cache.get(lang.name) {
            return entry.clone();
        }
    }

    let source = lang.query_source();
    let compiled = if source.trim().is_empty() {
        None
    } else {
        match Query::new(&lang.language(), source) {
            Ok(query) => {
                let kinds = query
                    .capture_names()
                    .iter()
                    .map(|name| capture_kind(name))
                    .collect();
                Some(Arc::new(CompiledQuery { query, kinds }))
            }
            Err(e) => {
                tracing::warn!(language = lang.name, error = %e, "query failed to compile");
                None
            }
        }
    };

    let mut cache = QUERY_CACHE.write().unwrap();
    cache.entry(lang.name).or_insert(compiled).clone()
}

/// Parse source text with the given language's grammar.
///
/// Returns `None` when the grammar rejects the source outright; partial
/// parses still come back as trees with ERROR nodes.
pub fn parse_source(lang: &LanguageConfig, source: &str) -> Option<Tree> {
    let mut parser = TsParser::new();
    if let Err(e) = parser.set_language(&lang.language()) {
        tracing::warn!(language = lang.name, error = %e, "grammar version mismatch");
        return None;
    }
    parser.parse(source, None)
}

/// Convert a tree-sitter node span to a [`Range`].
pub fn node_range(node: &Node) -> Range {
    let start = node.start_position();
    let end = node.end_position();
    Range::new(
        Pos::new(start.row, start.column),
        Pos::new(end.row, end.column),
    )
}

/// Text of a node within its source.
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Run the query over a tree and collect `(capture id, node)` pairs in
/// document order. Text predicates (`#eq?`, `#match?`) are evaluated by
/// the cursor against the provided source.
pub fn collect_captures<'tree>(
    compiled: &CompiledQuery,
    tree: &'tree Tree,
    source: &str,
) -> Vec<(u32, Node<'tree>)> {
    let mut cursor = QueryCursor::new();
    let mut out = Vec::new();
    let mut captures = cursor.captures(&compiled.query, tree.root_node(), source.as_bytes());
    while let Some((mat, capture_index)) = captures.next() {
        let capture = mat.captures[*capture_index];
        out.push((capture.index, capture.node));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_kind_parsing() {
        assert_eq!(
            capture_kind("symbol.class.def"),
            CaptureKind::SymbolDef(SymbolKind::Class)
        );
        assert_eq!(
            capture_kind("rel.dynamic_import.source"),
            CaptureKind::Rel(RelationshipKind::DynamicImport)
        );
        assert_eq!(capture_kind("rel.call"), CaptureKind::Rel(RelationshipKind::Call));
        assert_eq!(capture_kind("mod.export"), CaptureKind::Modifier(ModKind::Export));
        assert_eq!(capture_kind("_fn"), CaptureKind::Other);
        assert_eq!(capture_kind("scope.function.def"), CaptureKind::Other);
        assert_eq!(capture_kind("symbol.bogus.def"), CaptureKind::Other);
    }

    #[test]
    fn test_all_language_queries_compile() {
        for lang in crate::lang::all() {
            let compiled = Query::new(&lang.language(), lang.query_source());
            assert!(compiled.is_ok(), "{} query: {:?}", lang.name, compiled.err());
        }
    }

    #[test]
    fn test_parse_typescript_source() {
        let lang = crate::lang::for_path("a.ts").unwrap();
        let tree = parse_source(lang, "export function foo(): number { return 1; }").unwrap();
        assert!(!tree.root_node().has_error());
    }
}
