//! Cross-file resolution.
//!
//! Links relationships to concrete files and symbols: import paths are
//! chased through alias expansion and extension probing, and bare names
//! are matched first against the owning file's symbols, then against the
//! exported names of files it imports. Resolution never fails; whatever
//! stays unresolved is simply left for the formatter to skip or tag.

use std::collections::BTreeMap;

use crate::model::{Relationship, SourceFile};
use crate::paths;

/// Maps an import specifier to a root-relative path when a configured
/// alias applies, `None` otherwise.
pub type PathResolver<'a> = dyn Fn(&str) -> Option<String> + Send + Sync + 'a;

/// A resolver that applies no aliases.
pub fn no_aliases(_specifier: &str) -> Option<String> {
    None
}

/// Extensions probed when an import omits one, in priority order. The
/// empty string covers fully spelled specifiers.
const EXTENSIONS: [&str; 11] = [
    ".ts", ".tsx", ".js", ".jsx", ".css", ".go", ".rs", ".py", ".java", ".graphql", "",
];

/// Exported symbol names per file id; later symbols shadow earlier ones
/// with the same name.
type ExportMap = BTreeMap<u32, BTreeMap<String, String>>;

/// Resolve every relationship in the project, in place.
pub fn resolve_graph(files: &mut [SourceFile], path_resolver: &PathResolver<'_>, root: &str) {
    let file_map: BTreeMap<String, u32> = files
        .iter()
        .map(|f| (f.relative_path.replace('\\', "/"), f.id))
        .collect();

    let mut exports: ExportMap = BTreeMap::new();
    for file in files.iter() {
        let mut by_name = BTreeMap::new();
        for sym in file.symbols.iter().filter(|s| s.is_exported) {
            by_name.insert(sym.name.clone(), sym.id.clone());
        }
        exports.insert(file.id, by_name);
    }

    for i in 0..files.len() {
        let file_id = files[i].id;
        let current_dir = paths::dirname(&files[i].absolute_path).to_string();

        // Imports first: name lookups below walk the resolved imports.
        for rel in files[i].file_relationships.iter_mut() {
            if rel.kind.is_import() {
                rel.resolved_file_id =
                    find_file(&rel.target_name, &current_dir, &file_map, path_resolver, root);
            }
        }

        let own_symbols: Vec<(String, String)> = files[i]
            .symbols
            .iter()
            .map(|s| (s.name.clone(), s.id.clone()))
            .collect();
        let resolved_imports: Vec<u32> = files[i]
            .file_relationships
            .iter()
            .filter(|r| r.kind.is_import())
            .filter_map(|r| r.resolved_file_id)
            .collect();

        let resolve_name = |rel: &mut Relationship| {
            if rel.kind.is_import() {
                rel.resolved_file_id =
                    find_file(&rel.target_name, &current_dir, &file_map, path_resolver, root);
                return;
            }
            if let Some((_, id)) = own_symbols.iter().find(|(name, _)| *name == rel.target_name) {
                rel.resolved_symbol_id = Some(id.clone());
                rel.resolved_file_id = Some(file_id);
                return;
            }
            for import_id in &resolved_imports {
                if let Some(symbol_id) = exports
                    .get(import_id)
                    .and_then(|m| m.get(&rel.target_name))
                {
                    rel.resolved_file_id = Some(*import_id);
                    rel.resolved_symbol_id = Some(symbol_id.clone());
                    return;
                }
            }
        };

        let mut file_rels = std::mem::take(&mut files[i].file_relationships);
        for rel in file_rels.iter_mut().filter(|r| !r.kind.is_import()) {
            resolve_name(rel);
        }
        let mut symbols = std::mem::take(&mut files[i].symbols);
        for sym in symbols.iter_mut() {
            for rel in sym.dependencies.iter_mut() {
                resolve_name(rel);
            }
        }
        files[i].file_relationships = file_rels;
        files[i].symbols = symbols;
    }
}

/// Chase an import specifier to a known file: apply aliases, resolve
/// against the importing file's directory (or the root for aliased
/// paths), then probe extensions and `index.*` entries.
fn find_file(
    import_path: &str,
    current_dir: &str,
    file_map: &BTreeMap<String, u32>,
    path_resolver: &PathResolver<'_>,
    root: &str,
) -> Option<u32> {
    let resolved = match path_resolver(import_path) {
        Some(aliased) => paths::resolve(&[root, &aliased]),
        None => paths::resolve(&[current_dir, import_path]),
    };

    for ext in EXTENSIONS {
        let try_path = format!("{resolved}{ext}").replace('\\', "/");
        let rel = paths::relative(root, &try_path).replace('\\', "/");
        if let Some(id) = file_map.get(&rel) {
            return Some(*id);
        }

        let index_name = format!("index{ext}");
        let try_index = paths::join(&[&resolved, &index_name]).replace('\\', "/");
        let rel_index = paths::relative(root, &try_index).replace('\\', "/");
        if let Some(id) = file_map.get(&rel_index) {
            return Some(*id);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CodeSymbol, RelationshipKind, SymbolKind};
    use crate::span::{Pos, Range};

    fn file(id: u32, rel_path: &str) -> SourceFile {
        SourceFile::new(
            id,
            rel_path.to_string(),
            format!("/proj/{rel_path}"),
            String::new(),
        )
    }

    fn exported(file_id: u32, name: &str, line: usize) -> CodeSymbol {
        let r = Range::new(Pos::new(line, 0), Pos::new(line, name.len()));
        let mut s = CodeSymbol::new(file_id, name.to_string(), SymbolKind::Function, r, r);
        s.is_exported = true;
        s
    }

    fn rel(kind: RelationshipKind, target: &str, line: usize) -> Relationship {
        Relationship::new(
            kind,
            target.to_string(),
            Range::new(Pos::new(line, 0), Pos::new(line, 1)),
        )
    }

    #[test]
    fn test_import_resolves_without_extension() {
        let mut helper = file(1, "src/helper.ts");
        helper.symbols.push(exported(1, "greet", 0));
        let mut main = file(2, "src/main.ts");
        main.file_relationships
            .push(rel(RelationshipKind::Import, "./helper", 0));

        let mut files = vec![helper, main];
        resolve_graph(&mut files, &no_aliases, "/proj");
        assert_eq!(files[1].file_relationships[0].resolved_file_id, Some(1));
    }

    #[test]
    fn test_import_resolves_to_index_file() {
        let lib = file(1, "src/lib/index.ts");
        let mut main = file(2, "src/main.ts");
        main.file_relationships
            .push(rel(RelationshipKind::Import, "./lib", 0));

        let mut files = vec![lib, main];
        resolve_graph(&mut files, &no_aliases, "/proj");
        assert_eq!(files[1].file_relationships[0].resolved_file_id, Some(1));
    }

    #[test]
    fn test_call_resolves_through_import() {
        let mut helper = file(1, "src/helper.ts");
        helper.symbols.push(exported(1, "greet", 0));
        let helper_id = helper.symbols[0].id.clone();

        let mut main = file(2, "src/main.ts");
        main.file_relationships
            .push(rel(RelationshipKind::Import, "./helper", 0));
        let mut caller = exported(2, "run", 1);
        caller
            .dependencies
            .push(rel(RelationshipKind::Call, "greet", 2));
        main.symbols.push(caller);

        let mut files = vec![helper, main];
        resolve_graph(&mut files, &no_aliases, "/proj");
        let dep = &files[1].symbols[0].dependencies[0];
        assert_eq!(dep.resolved_file_id, Some(1));
        assert_eq!(dep.resolved_symbol_id.as_deref(), Some(helper_id.as_str()));
    }

    #[test]
    fn test_intra_file_resolution_wins() {
        let mut f = file(1, "src/a.ts");
        f.symbols.push(exported(1, "local", 0));
        let mut caller = exported(1, "run", 1);
        caller
            .dependencies
            .push(rel(RelationshipKind::Call, "local", 2));
        f.symbols.push(caller);

        let mut files = vec![f];
        resolve_graph(&mut files, &no_aliases, "/proj");
        let dep = &files[0].symbols[1].dependencies[0];
        assert_eq!(dep.resolved_file_id, Some(1));
        assert!(dep.resolved_symbol_id.is_some());
    }

    #[test]
    fn test_unimported_name_stays_unresolved() {
        let mut other = file(1, "src/other.ts");
        other.symbols.push(exported(1, "orphan", 0));
        let mut main = file(2, "src/main.ts");
        let mut caller = exported(2, "run", 0);
        caller
            .dependencies
            .push(rel(RelationshipKind::Call, "orphan", 1));
        main.symbols.push(caller);

        let mut files = vec![other, main];
        resolve_graph(&mut files, &no_aliases, "/proj");
        let dep = &files[1].symbols[0].dependencies[0];
        assert_eq!(dep.resolved_file_id, None);
        assert_eq!(dep.resolved_symbol_id, None);
    }

    #[test]
    fn test_alias_resolution() {
        let mut target = file(1, "src/components/Button.tsx");
        target.symbols.push(exported(1, "Button", 0));
        let mut main = file(2, "src/pages/home.tsx");
        main.file_relationships
            .push(rel(RelationshipKind::Import, "@components/Button", 0));

        let resolver = |spec: &str| {
            spec.strip_prefix("@components/")
                .map(|rest| format!("src/components/{rest}"))
        };
        let mut files = vec![target, main];
        resolve_graph(&mut files, &resolver, "/proj");
        assert_eq!(files[1].file_relationships[0].resolved_file_id, Some(1));
    }
}
