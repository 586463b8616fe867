//! Integration tests for the full analysis pipeline.
//!
//! These run the real tree-sitter grammars against the testdata fixture
//! project: a small TypeScript web app with an import alias, a styled
//! component, and a stylesheet.

use std::path::{Path, PathBuf};

use scn::model::{SourceFile, SymbolKind};
use scn::project::{analyze_project, InputFile, ProjectOptions};
use scn::{format_scn, lang, ResolvedOptions, ScnConfig};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("webapp")
}

/// Read every supported source file under the fixture root, with paths
/// relative to it, the way the CLI does.
fn fixture_inputs(root: &Path) -> Vec<InputFile> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(lang::is_supported)
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
        .into_iter()
        .map(|p| InputFile {
            path: p
                .strip_prefix(root)
                .expect("fixture paths are under the root")
                .to_string_lossy()
                .replace('\\', "/"),
            content: std::fs::read_to_string(&p).expect("fixture should be readable"),
        })
        .collect()
}

fn analyze_fixture() -> Vec<SourceFile> {
    let root = testdata_path();
    let (_, config) = ScnConfig::discover(&root)
        .expect("config should load")
        .expect("fixture has a scn.yaml");
    let resolver = config.path_resolver();
    let options = ProjectOptions {
        exclude: config.exclude.clone(),
        path_resolver: Some(&resolver),
        ..ProjectOptions::default()
    };
    analyze_project(fixture_inputs(&root), &options)
        .expect("analysis should succeed")
        .files
}

fn file<'a>(files: &'a [SourceFile], path: &str) -> &'a SourceFile {
    files
        .iter()
        .find(|f| f.relative_path == path)
        .unwrap_or_else(|| panic!("missing file {path}"))
}

#[test]
fn test_excludes_are_applied() {
    let files = analyze_fixture();
    let paths: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "components/Button.tsx",
            "lib/api.ts",
            "main.ts",
            "styles.css"
        ]
    );
}

#[test]
fn test_interface_members_inherit_visibility() {
    let files = analyze_fixture();
    let api = file(&files, "lib/api.ts");
    assert!(api.has_exported_symbols());

    let user = api.symbols.iter().find(|s| s.name == "User").unwrap();
    assert_eq!(user.kind, SymbolKind::Interface);
    assert!(user.is_exported);

    let id = api
        .symbols
        .iter()
        .find(|s| s.name == "id" && s.kind == SymbolKind::Property)
        .unwrap();
    assert!(id.is_exported, "interface members follow the interface");

    let request = api.symbols.iter().find(|s| s.name == "request").unwrap();
    assert!(!request.is_exported);
}

#[test]
fn test_signature_and_async_extraction() {
    let files = analyze_fixture();
    let api = file(&files, "lib/api.ts");
    let fetch_user = api.symbols.iter().find(|s| s.name == "fetchUser").unwrap();
    assert!(fetch_user.is_exported);
    assert!(fetch_user.is_async);
    assert_eq!(
        fetch_user.signature.as_deref(),
        Some("(id: #string): #Promise<User>")
    );
}

#[test]
fn test_aliased_import_resolves_across_files() {
    let files = analyze_fixture();
    let api_id = file(&files, "lib/api.ts").id;
    let main = file(&files, "main.ts");

    let import = main
        .file_relationships
        .iter()
        .find(|r| r.kind.is_import())
        .unwrap();
    assert_eq!(import.target_name, "@lib/api");
    assert_eq!(import.resolved_file_id, Some(api_id));

    let run = main.symbols.iter().find(|s| s.name == "run").unwrap();
    let call = run
        .dependencies
        .iter()
        .find(|d| d.target_name == "fetchUser")
        .unwrap();
    assert_eq!(call.resolved_file_id, Some(api_id));
    assert!(call.resolved_symbol_id.is_some());
}

#[test]
fn test_styled_and_react_components() {
    let files = analyze_fixture();
    let button = file(&files, "components/Button.tsx");

    let wrapper = button.symbols.iter().find(|s| s.name == "Wrapper").unwrap();
    assert_eq!(wrapper.kind, SymbolKind::StyledComponent);
    assert_eq!(wrapper.styled_tag.as_deref(), Some("button"));
    assert!(wrapper.is_exported);

    let component = button.symbols.iter().find(|s| s.name == "Button").unwrap();
    assert_eq!(component.kind, SymbolKind::ReactComponent);
}

#[test]
fn test_css_symbols() {
    let files = analyze_fixture();
    let styles = file(&files, "styles.css");

    assert!(styles
        .symbols
        .iter()
        .any(|s| s.kind == SymbolKind::CssClass && s.name == "button"));
    assert!(styles
        .symbols
        .iter()
        .any(|s| s.kind == SymbolKind::CssAtRule
            && s.name.starts_with("@media")));
}

#[test]
fn test_symbol_ranges_stay_within_their_scopes() {
    let files = analyze_fixture();
    for file in &files {
        for sym in &file.symbols {
            assert!(
                sym.scope_range.contains(&sym.range),
                "{}: symbol {} ({:?}) is outside its own scope",
                file.relative_path,
                sym.name,
                sym.kind
            );
        }
    }
}

#[test]
fn test_output_is_deterministic() {
    let first = format_scn(&analyze_fixture(), &ResolvedOptions::default());
    let second = format_scn(&analyze_fixture(), &ResolvedOptions::default());
    assert!(!first.is_empty());
    assert_eq!(first, second, "identical inputs must render identically");
}

#[test]
fn test_json_serialization_omits_source_text() {
    let files = analyze_fixture();
    let json = serde_json::to_string(&files).expect("files should serialize");
    assert!(json.contains("\"relative_path\""));
    assert!(!json.contains("fetch(path)"), "raw source stays out of JSON");
}
