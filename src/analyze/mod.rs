//! Capture interpretation: from a parse tree to symbols and relationships.
//!
//! Analysis runs in four phases over one file's captures, in document
//! order:
//!
//! 1. every `symbol.*.def` capture creates a [`CodeSymbol`],
//! 2. every `mod.*` capture mutates its nearest enclosing symbol,
//! 3. every `rel.*` capture becomes a [`Relationship`],
//! 4. each relationship attaches to its nearest enclosing symbol, or to
//!    the file itself when no symbol contains it.
//!
//! A handful of post-passes then normalize the result: constructor
//! dedup, positional ordering, member visibility inheritance, and label
//! synthesis.

pub mod names;
pub mod scope;
pub mod text;

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::{Node, Tree};

use crate::lang::LanguageConfig;
use crate::model::{
    Accessibility, CodeSymbol, Relationship, RelationshipKind, SourceFile, SymbolKind,
};
use crate::parse::{self, CaptureKind, ModKind};

static EXPORT_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*export\b").unwrap());
static DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^['"](use (?:server|client))['"];"#).unwrap());
static PUBLIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bpublic\b").unwrap());
static PRIVATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bprivate\b").unwrap());
static PROTECTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bprotected\b").unwrap());

/// Interpret a file's parse tree in place, filling `symbols` and
/// `file_relationships`.
pub fn analyze_file(file: &mut SourceFile, tree: &Tree, lang: &'static LanguageConfig) {
    detect_file_attributes(file);

    let Some(compiled) = parse::compiled_query(lang) else {
        return;
    };
    let captures = parse::collect_captures(&compiled, tree, &file.source);

    // Phase 1: create symbols.
    let mut symbols: Vec<CodeSymbol> = Vec::new();
    for (idx, node) in &captures {
        if let CaptureKind::SymbolDef(kind) = compiled.kinds[*idx as usize] {
            symbols.push(create_symbol(kind, node, file.id, &file.source));
        }
    }

    // Phase 2: modifiers mutate their nearest enclosing symbol.
    for (idx, node) in &captures {
        if let CaptureKind::Modifier(mk) = compiled.kinds[*idx as usize] {
            apply_modifier(mk, node, &file.source, &mut symbols);
        }
    }

    // Phases 3 and 4: collect relationships and attach each to the
    // nearest enclosing symbol, falling back to the file.
    let mut file_rels: Vec<Relationship> = Vec::new();
    for (idx, node) in &captures {
        if let CaptureKind::Rel(kind) = compiled.kinds[*idx as usize] {
            let target: String = parse::node_text(node, &file.source)
                .chars()
                .filter(|c| !matches!(c, '\'' | '"' | '`'))
                .collect();
            let rel = Relationship::new(kind, target, parse::node_range(node));
            match scope::nearest_enclosing_index(&rel.range, &symbols)
                .or_else(|| annotated_symbol_index(&rel, &symbols))
            {
                Some(i) => symbols[i].dependencies.push(rel),
                None => file_rels.push(rel),
            }
        }
    }

    finalize(&mut symbols, &file.source);
    file.symbols = symbols;
    file.file_relationships = file_rels;
}

/// Attribute macros sit above the item they annotate rather than inside
/// it, so a macro reference with no enclosing symbol belongs to the
/// first symbol declared after it.
fn annotated_symbol_index(rel: &Relationship, symbols: &[CodeSymbol]) -> Option<usize> {
    if rel.kind != RelationshipKind::Macro {
        return None;
    }
    symbols
        .iter()
        .enumerate()
        .filter(|(_, s)| s.scope_range.start > rel.range.end)
        .min_by_key(|(_, s)| s.scope_range.start)
        .map(|(i, _)| i)
}

/// Directives and generated-file markers are textual, not tree-based, so
/// they survive even when parsing fails entirely.
fn detect_file_attributes(file: &mut SourceFile) {
    file.language_directives = DIRECTIVE
        .captures_iter(&file.source)
        .map(|c| c[1].to_string())
        .collect();
    if file.source.contains("AUTO-GENERATED") || file.source.contains("eslint-disable") {
        file.is_generated = true;
    }
}

/// Node types that wrap a captured name node and define its scope.
fn is_scope_wrapper(kind: &str) -> bool {
    kind.ends_with("_declaration")
        || kind.ends_with("_definition")
        || kind.ends_with("_signature")
        || kind == "variable_declarator"
        || kind == "internal_module"
}

fn has_export_ancestor(node: &Node) -> bool {
    let mut cur = node.parent();
    while let Some(n) = cur {
        if n.kind() == "export_statement" {
            return true;
        }
        cur = n.parent();
    }
    false
}

fn create_symbol(kind: SymbolKind, node: &Node, file_id: u32, source: &str) -> CodeSymbol {
    let scope_node = match node.parent() {
        Some(p) if is_scope_wrapper(p.kind()) => p,
        _ => *node,
    };
    let scope_text = parse::node_text(&scope_node, source);

    let (kind, styled_tag) = refine_kind(kind, node, &scope_node, source);

    let mut name = names::symbol_name(node, source);
    if matches!(
        kind,
        SymbolKind::TypeAlias | SymbolKind::Interface | SymbolKind::Class
    ) && scope_node.kind().ends_with("_declaration")
    {
        if let Some(params) = scope_node.child_by_field_name("type_parameters") {
            name.push_str(parse::node_text(&params, source));
        }
    }

    let mut sym = CodeSymbol::new(
        file_id,
        name,
        kind,
        parse::node_range(node),
        parse::node_range(&scope_node),
    );
    sym.styled_tag = styled_tag;
    sym.is_exported = has_export_ancestor(&scope_node) || EXPORT_PREFIX.is_match(scope_text);
    text::apply(&mut sym, scope_text);
    sym
}

/// Upgrade generic `variable`/`function` captures to react or styled
/// components based on what the declaration's value looks like.
fn refine_kind(
    kind: SymbolKind,
    node: &Node,
    scope_node: &Node,
    source: &str,
) -> (SymbolKind, Option<String>) {
    if kind == SymbolKind::Variable && scope_node.kind() == "variable_declarator" {
        if let Some(value) = scope_node.child_by_field_name("value") {
            match value.kind() {
                "arrow_function" => {
                    let kind = match value.child_by_field_name("body") {
                        Some(body) if body.kind().starts_with("jsx_") => {
                            SymbolKind::ReactComponent
                        }
                        Some(body)
                            if body.kind() == "parenthesized_expression"
                                && names::contains_jsx(&body) =>
                        {
                            SymbolKind::ReactComponent
                        }
                        Some(body)
                            if body.kind() == "statement_block"
                                && names::contains_jsx_return(&body) =>
                        {
                            SymbolKind::ReactComponent
                        }
                        _ => SymbolKind::Function,
                    };
                    return (kind, None);
                }
                "call_expression" => {
                    if let Some(refined) = refine_call_value(&value, source) {
                        return refined;
                    }
                }
                _ => {}
            }
        }
    }

    if kind == SymbolKind::Function {
        match scope_node.kind() {
            "function_declaration" => {
                if let Some(body) = scope_node.child_by_field_name("body") {
                    if names::contains_jsx_return(&body) {
                        return (SymbolKind::ReactComponent, None);
                    }
                }
            }
            // Render props stay plain functions even though they yield
            // JSX; other JSX-producing arrows become components.
            "arrow_function" => {
                let is_render_prop = node
                    .parent()
                    .map(|p| p.kind() == "jsx_expression")
                    .unwrap_or(false);
                if !is_render_prop {
                    if let Some(body) = scope_node.child_by_field_name("body") {
                        if body.kind().starts_with("jsx_")
                            || names::contains_jsx(&body)
                            || names::contains_jsx_return(&body)
                        {
                            return (SymbolKind::ReactComponent, None);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    (kind, None)
}

/// `forwardRef(...)` wrappers and `styled.div` / `styled(Base)` tagged
/// templates, both of which parse as call expressions.
fn refine_call_value(value: &Node, source: &str) -> Option<(SymbolKind, Option<String>)> {
    let callee = value.child_by_field_name("function")?;
    if parse::node_text(&callee, source).ends_with("forwardRef") {
        return Some((SymbolKind::ReactComponent, None));
    }
    match callee.kind() {
        "member_expression" => {
            let object = callee.child_by_field_name("object")?;
            if parse::node_text(&object, source) == "styled" {
                let tag = callee
                    .child_by_field_name("property")
                    .map(|p| parse::node_text(&p, source).to_string());
                return Some((SymbolKind::StyledComponent, tag));
            }
        }
        "call_expression" => {
            let inner = callee.child_by_field_name("function")?;
            if parse::node_text(&inner, source) == "styled" {
                let tag = callee
                    .child_by_field_name("arguments")
                    .and_then(|args| args.named_child(0))
                    .map(|a| parse::node_text(&a, source).to_string());
                return Some((SymbolKind::StyledComponent, tag));
            }
        }
        _ => {}
    }
    None
}

fn apply_modifier(mk: ModKind, node: &Node, source: &str, symbols: &mut [CodeSymbol]) {
    let range = parse::node_range(node);
    let Some(i) = scope::nearest_enclosing_index(&range, symbols) else {
        return;
    };
    let sym = &mut symbols[i];
    match mk {
        ModKind::Export => sym.is_exported = true,
        ModKind::Static => sym.is_static = true,
        ModKind::Abstract => sym.is_abstract = true,
        ModKind::Readonly => sym.is_readonly = true,
        ModKind::Async => sym.is_async = true,
        ModKind::Accessibility => {
            let text = parse::node_text(node, source);
            if PUBLIC.is_match(text) {
                sym.accessibility = Some(Accessibility::Public);
                sym.is_exported = true;
            } else if PRIVATE.is_match(text) {
                sym.accessibility = Some(Accessibility::Private);
                sym.is_exported = false;
            } else if PROTECTED.is_match(text) {
                sym.accessibility = Some(Accessibility::Protected);
                sym.is_exported = false;
            }
        }
    }
}

fn finalize(symbols: &mut Vec<CodeSymbol>, source: &str) {
    // The plain-method query pattern also matches constructors; drop the
    // duplicates and keep the dedicated constructor capture.
    symbols.retain(|s| !(s.kind == SymbolKind::Method && s.name == "constructor"));

    symbols.sort_by_key(|s| (s.range.start.line, s.range.start.column));

    // Members without an explicit accessibility keyword inherit their
    // container's visibility; private/protected always lose it.
    let parents: Vec<Option<(SymbolKind, bool)>> = (0..symbols.len())
        .map(|i| {
            scope::nearest_enclosing_excluding(&symbols[i].range, symbols, Some(i))
                .map(|p| (symbols[p].kind, symbols[p].is_exported))
        })
        .collect();
    for (sym, parent) in symbols.iter_mut().zip(parents) {
        if sym.kind.is_member() {
            match parent {
                Some((SymbolKind::Interface, exported)) => sym.is_exported = exported,
                Some((SymbolKind::Class, exported)) => {
                    if matches!(
                        sym.accessibility,
                        Some(Accessibility::Private) | Some(Accessibility::Protected)
                    ) {
                        sym.is_exported = false;
                    } else {
                        sym.is_exported = exported;
                    }
                }
                _ => {}
            }
        }

        if sym.kind == SymbolKind::Class && sym.is_abstract {
            sym.labels.push("abstract".to_string());
        }
        if sym.kind == SymbolKind::Method && sym.is_abstract {
            sym.labels.push("abstract".to_string());
            sym.is_exported = false;
        }
    }

    // Symbol() and Proxy assignments are invisible to the queries; a
    // whole-source regex is enough to tag the variables involved.
    for sym in symbols.iter_mut() {
        if sym.kind != SymbolKind::Variable {
            continue;
        }
        let escaped = regex::escape(&sym.name);
        if pattern_matches(&format!(r"\b{escaped}\s*=\s*Symbol\s*\("), source) {
            sym.labels.push("symbol".to_string());
        }
        if pattern_matches(&format!(r"\b{escaped}\s*=\s*new\s+Proxy\s*\("), source) {
            sym.labels.push("proxy".to_string());
        }
    }
}

fn pattern_matches(pattern: &str, text: &str) -> bool {
    Regex::new(pattern).map(|re| re.is_match(text)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang;
    use crate::model::RelationshipKind;

    fn analyze_str(path: &str, source: &str) -> SourceFile {
        let lang = lang::for_path(path).unwrap();
        let tree = parse::parse_source(lang, source).unwrap();
        let mut file = SourceFile::new(1, path.to_string(), format!("/{path}"), source.to_string());
        analyze_file(&mut file, &tree, lang);
        file
    }

    #[test]
    fn test_exported_function_with_signature() {
        let file = analyze_str(
            "util.ts",
            "export function add(a: number, b: number): number { return a + b; }",
        );
        let sym = &file.symbols[0];
        assert_eq!(sym.name, "add");
        assert_eq!(sym.kind, SymbolKind::Function);
        assert!(sym.is_exported);
        assert_eq!(sym.id, "1:16");
        assert_eq!(
            sym.signature.as_deref(),
            Some("(a: #number, b: #number): #number")
        );
    }

    #[test]
    fn test_class_members_inherit_visibility() {
        let src = "\
export class Store {
  private cache: Map<string, string>;
  get(key: string): string { return this.cache.get(key); }
  private evict(): void {}
}
";
        let file = analyze_str("store.ts", src);
        let class = file.symbols.iter().find(|s| s.name == "Store").unwrap();
        assert!(class.is_exported);
        let cache = file.symbols.iter().find(|s| s.name == "cache").unwrap();
        assert_eq!(cache.kind, SymbolKind::Property);
        assert!(!cache.is_exported);
        let get = file.symbols.iter().find(|s| s.name == "get").unwrap();
        assert!(get.is_exported, "unmarked member inherits class visibility");
        let evict = file.symbols.iter().find(|s| s.name == "evict").unwrap();
        assert!(!evict.is_exported);
    }

    #[test]
    fn test_constructor_dedup() {
        let src = "class A { constructor(x: number) {} }";
        let file = analyze_str("a.ts", src);
        let ctors: Vec<_> = file
            .symbols
            .iter()
            .filter(|s| s.name == "constructor")
            .collect();
        assert_eq!(ctors.len(), 1);
        assert_eq!(ctors[0].kind, SymbolKind::Constructor);
    }

    #[test]
    fn test_abstract_class_label() {
        let src = "export abstract class Base { abstract run(): void; }";
        let file = analyze_str("base.ts", src);
        let class = file.symbols.iter().find(|s| s.name == "Base").unwrap();
        assert!(class.is_abstract);
        assert_eq!(class.labels, vec!["abstract"]);
        let run = file.symbols.iter().find(|s| s.name == "run").unwrap();
        assert!(run.is_abstract);
        assert!(!run.is_exported, "abstract methods are never exported");
    }

    #[test]
    fn test_import_attaches_to_file() {
        let src = "import { helper } from './helper';\nexport function run() { helper(); }\n";
        let file = analyze_str("run.ts", src);
        assert_eq!(file.file_relationships.len(), 1);
        let imp = &file.file_relationships[0];
        assert_eq!(imp.kind, RelationshipKind::Import);
        assert_eq!(imp.target_name, "./helper");
        let run = file.symbols.iter().find(|s| s.name == "run").unwrap();
        assert!(run
            .dependencies
            .iter()
            .any(|d| d.kind == RelationshipKind::Call && d.target_name == "helper"));
    }

    #[test]
    fn test_arrow_component_detection() {
        let src = "export const App = () => <div>hi</div>;\nconst helper = () => 42;\n";
        let file = analyze_str("app.tsx", src);
        let app = file.symbols.iter().find(|s| s.name == "App").unwrap();
        assert_eq!(app.kind, SymbolKind::ReactComponent);
        let helper = file.symbols.iter().find(|s| s.name == "helper").unwrap();
        assert_eq!(helper.kind, SymbolKind::Function);
    }

    #[test]
    fn test_styled_component_detection() {
        let src = "const Button = styled.button`color: red;`;\nconst Fancy = styled(Button)`margin: 0;`;\n";
        let file = analyze_str("button.tsx", src);
        let button = file.symbols.iter().find(|s| s.name == "Button").unwrap();
        assert_eq!(button.kind, SymbolKind::StyledComponent);
        assert_eq!(button.styled_tag.as_deref(), Some("button"));
        let fancy = file.symbols.iter().find(|s| s.name == "Fancy").unwrap();
        assert_eq!(fancy.styled_tag.as_deref(), Some("Button"));
    }

    #[test]
    fn test_type_alias_generics_in_name() {
        let src = "export type Result<T> = { ok: boolean; value: T };";
        let file = analyze_str("result.ts", src);
        let alias = file.symbols.iter().find(|s| s.kind == SymbolKind::TypeAlias).unwrap();
        assert_eq!(alias.name, "Result<T>");
    }

    #[test]
    fn test_directives_and_generated_detection() {
        let src = "'use client';\n// eslint-disable\nexport const x = 1;\n";
        let file = analyze_str("page.tsx", src);
        assert_eq!(file.language_directives, vec!["use client"]);
        assert!(file.is_generated);
    }

    #[test]
    fn test_symbol_label_detection() {
        let src = "const token = Symbol('token');\n";
        let file = analyze_str("token.ts", src);
        let sym = file.symbols.iter().find(|s| s.name == "token").unwrap();
        assert!(sym.labels.contains(&"symbol".to_string()));
    }

    #[test]
    fn test_css_symbols() {
        let src = ".card { color: red; }\n@media (min-width: 600px) { .card { color: blue; } }\n";
        let file = analyze_str("style.css", src);
        assert!(file
            .symbols
            .iter()
            .any(|s| s.kind == SymbolKind::CssClass && s.name == "card"));
        assert!(file
            .symbols
            .iter()
            .any(|s| s.kind == SymbolKind::CssAtRule && s.name == "@media (min-width: 600px)"));
    }

    #[test]
    fn test_css_variable_usage() {
        let src = ":root { --accent: #f00; }\n.card { color: var(--accent); }\n";
        let file = analyze_str("theme.css", src);
        assert!(file
            .symbols
            .iter()
            .any(|s| s.kind == SymbolKind::CssVariable && s.name == "--accent"));
        assert!(
            file.file_relationships
                .iter()
                .any(|r| r.kind == RelationshipKind::CssVariable
                    && r.target_name == "--accent"),
            "var(--accent) should produce a usage relationship"
        );
    }

    #[test]
    fn test_go_symbols() {
        let src = "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tgo worker()\n\tfmt.Println(\"x\")\n}\n";
        let file = analyze_str("main.go", src);
        assert!(file
            .symbols
            .iter()
            .any(|s| s.kind == SymbolKind::GoPackage && s.name == "main"));
        let main = file.symbols.iter().find(|s| s.name == "main" && s.kind == SymbolKind::Function).unwrap();
        assert!(main
            .dependencies
            .iter()
            .any(|d| d.kind == RelationshipKind::Goroutine && d.target_name == "worker"));
    }

    #[test]
    fn test_attribute_macro_attaches_to_following_item() {
        let src = "#[derive(Debug)]\nstruct Config {\n    name: String,\n}\n";
        let file = analyze_str("config.rs", src);
        let config = file.symbols.iter().find(|s| s.name == "Config").unwrap();
        assert!(config
            .dependencies
            .iter()
            .any(|d| d.kind == RelationshipKind::Macro && d.target_name == "derive"));
        assert!(file.file_relationships.is_empty());
    }

    #[test]
    fn test_rust_impl_name() {
        let src = "struct Config;\n\nimpl Default for Config {\n    fn default() -> Self { Config }\n}\n";
        let file = analyze_str("config.rs", src);
        assert!(file
            .symbols
            .iter()
            .any(|s| s.kind == SymbolKind::RustImpl && s.name == "impl Default for Config"));
    }
}
