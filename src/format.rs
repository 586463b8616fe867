//! SCN text rendering.
//!
//! Renders resolved files in dependency order, one blank-line-separated
//! block per file. Every display element is gated by a field of
//! [`ResolvedOptions`]; the interplay between toggles, display-id
//! eligibility, and edge aggregation is deliberate and fixture-driven,
//! so changes here must hold the rendered corpus stable.

use std::collections::{BTreeMap, BTreeSet};

use phf::phf_map;

use crate::model::{CodeSymbol, RelationshipKind, SourceFile, SymbolKind};
use crate::options::ResolvedOptions;
use crate::order;

static ICONS: phf::Map<&'static str, &'static str> = phf_map! {
    "class" => "◇", "interface" => "{}", "function" => "~", "method" => "~",
    "constructor" => "~",
    "variable" => "@", "property" => "@", "enum" => "☰", "enum_member" => "@",
    "type_alias" => "=:", "module" => "◇",
    "react_component" => "◇", "styled_component" => "~", "jsx_element" => "⛶",
    "css_class" => "¶", "css_id" => "¶", "css_tag" => "¶", "css_at_rule" => "¶",
    "css_variable" => "@",
    "go_package" => "◇",
    "rust_struct" => "◇", "rust_trait" => "{}", "rust_impl" => "+",
};

const DEFAULT_ICON: &str = "?";

/// Render the whole project.
pub fn format_scn(files: &[SourceFile], options: &ResolvedOptions) -> String {
    order::dependency_order(files)
        .into_iter()
        .map(|i| format_file(&files[i], files, options))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Properties and constructors never carry their own display id; plain
/// variables only do when they are part of the file's surface.
fn id_eligible(sym: &CodeSymbol) -> bool {
    match sym.kind {
        SymbolKind::Property | SymbolKind::Constructor => false,
        SymbolKind::Variable => {
            sym.is_exported || sym.name == "module.exports" || sym.name == "default"
        }
        _ => true,
    }
}

/// Dense 1-based index of a symbol among its file's id-eligible symbols,
/// in source order. Computed over all symbols, not the displayed subset,
/// so ids stay stable across display filters.
fn display_index(file: &SourceFile, sym: &CodeSymbol) -> Option<usize> {
    let mut eligible: Vec<&CodeSymbol> = file.symbols.iter().filter(|s| id_eligible(s)).collect();
    eligible.sort_by_key(|s| (s.range.start.line, s.range.start.column));
    eligible.iter().position(|s| s.id == sym.id).map(|i| i + 1)
}

fn render_ref(file_id: u32, index: usize, options: &ResolvedOptions) -> String {
    if options.show_file_ids {
        format!("({file_id}.{index})")
    } else {
        format!("(.{index})")
    }
}

fn symbol_ref(file: &SourceFile, sym: &CodeSymbol, options: &ResolvedOptions) -> Option<String> {
    display_index(file, sym).map(|i| render_ref(file.id, i, options))
}

fn find_file(all: &[SourceFile], id: u32) -> Option<&SourceFile> {
    all.iter().find(|f| f.id == id)
}

/// Display text for an edge target: the symbol's display id when one
/// resolves, the `.0` whole-file form otherwise.
fn target_ref(
    file_id: u32,
    symbol_id: Option<&str>,
    all: &[SourceFile],
    options: &ResolvedOptions,
) -> String {
    if let Some(sid) = symbol_id {
        if let Some(target_file) = find_file(all, file_id) {
            if let Some(target) = target_file.symbol_by_id(sid) {
                if let Some(r) = symbol_ref(target_file, target, options) {
                    return r;
                }
            }
        }
    }
    render_ref(file_id, 0, options)
}

fn format_symbol(
    sym: &CodeSymbol,
    file: &SourceFile,
    all: &[SourceFile],
    options: &ResolvedOptions,
    indent: &str,
) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();

    if sym.is_exported {
        if options.show_exported_indicator {
            segments.push("+".into());
        }
    } else if options.show_private_indicator {
        segments.push("-".into());
    }

    if options.show_icons {
        let glyph = ICONS.get(sym.kind.as_str()).copied().unwrap_or(DEFAULT_ICON);
        // Styled components fuse the glyph with the backing tag: '~div'.
        let icon = match &sym.styled_tag {
            Some(tag) => format!("{glyph}{tag}"),
            None => glyph.to_string(),
        };
        segments.push(icon);
    }

    if options.show_symbol_ids {
        if let Some(id) = symbol_ref(file, sym, options) {
            segments.push(id);
        }
    }

    let mut name = if sym.name == "<anonymous>"
        || (sym.kind == SymbolKind::Variable && sym.name.trim() == "default")
    {
        String::new()
    } else {
        sym.name.clone()
    };
    if let Some(sig) = &sym.signature {
        name.push_str(sig);
    }
    if let Some(t) = &sym.type_annotation {
        name.push_str(": ");
        name.push_str(t);
    }
    if let Some(v) = &sym.type_alias_value {
        name.push(' ');
        name.push_str(v);
    }
    let name = name.trim().to_string();
    if !name.is_empty() {
        segments.push(name);
    }

    if options.show_modifiers {
        let mods: Vec<&str> = [
            sym.is_abstract.then_some("abstract"),
            sym.is_static.then_some("static"),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !mods.is_empty() {
            segments.push(format!("[{}]", mods.join(" ")));
        }
    }

    // async and throws fuse into one token: '...!'.
    let mut effect = String::new();
    if sym.is_async {
        effect.push_str("...");
    }
    if sym.throws {
        effect.push('!');
    }
    if !effect.is_empty() {
        segments.push(effect);
    }
    if sym.is_pure {
        segments.push("o".into());
    }

    if options.show_tags {
        for label in sym.labels.iter().filter(|l| *l != "abstract") {
            segments.push(format!("[{label}]"));
        }
        if sym.styled_tag.is_some() {
            segments.push("[styled]".into());
        }
    }

    let mut lines = vec![format!("{indent}{}", segments.join(" "))];

    if options.show_outgoing {
        if let Some(line) = outgoing_line(sym, all, options) {
            lines.push(format!("{indent}  {line}"));
        }
    }
    if options.show_incoming {
        if let Some(line) = incoming_line(sym, all, options) {
            lines.push(format!("{indent}  {line}"));
        }
    }
    lines
}

/// One `->` line: resolved cross-file dependencies grouped by target
/// file in first-seen order, then unresolved macros.
fn outgoing_line(sym: &CodeSymbol, all: &[SourceFile], options: &ResolvedOptions) -> Option<String> {
    let mut groups: Vec<(u32, Vec<String>)> = Vec::new();
    let mut unresolved: Vec<String> = Vec::new();

    for dep in &sym.dependencies {
        match dep.resolved_file_id {
            Some(fid) if fid != sym.file_id => {
                let gi = match groups.iter().position(|(id, _)| *id == fid) {
                    Some(i) => i,
                    None => {
                        groups.push((fid, Vec::new()));
                        groups.len() - 1
                    }
                };
                let mut text = target_ref(fid, dep.resolved_symbol_id.as_deref(), all, options);
                if options.show_tags {
                    match dep.kind {
                        RelationshipKind::Goroutine => text.push_str(" [goroutine]"),
                        RelationshipKind::DynamicImport if dep.resolved_symbol_id.is_none() => {
                            text.push_str(" [dynamic]")
                        }
                        _ => {}
                    }
                }
                if !groups[gi].1.contains(&text) {
                    groups[gi].1.push(text);
                }
            }
            None if dep.kind == RelationshipKind::Macro => {
                let text = if options.show_tags {
                    format!("{} [macro]", dep.target_name)
                } else {
                    dep.target_name.clone()
                };
                if !unresolved.contains(&text) {
                    unresolved.push(text);
                }
            }
            _ => {}
        }
    }

    let mut parts: Vec<String> = groups
        .into_iter()
        .map(|(fid, texts)| {
            if texts.is_empty() {
                render_ref(fid, 0, options)
            } else {
                texts.join(", ")
            }
        })
        .collect();
    parts.extend(unresolved);

    if parts.is_empty() {
        None
    } else {
        Some(format!("-> {}", parts.join(", ")))
    }
}

/// One `<-` line: every symbol anywhere whose dependency resolves back
/// to this exact symbol, grouped by source file id ascending. Exported
/// symbols also count whole-file imports of their file, but only from
/// files with no symbol-level edge already.
fn incoming_line(sym: &CodeSymbol, all: &[SourceFile], options: &ResolvedOptions) -> Option<String> {
    let mut incoming: BTreeMap<u32, Vec<String>> = BTreeMap::new();

    for other in all {
        for s in &other.symbols {
            if s.file_id == sym.file_id && s.id == sym.id {
                continue;
            }
            let points_here = s.dependencies.iter().any(|d| {
                d.resolved_file_id == Some(sym.file_id)
                    && d.resolved_symbol_id.as_deref() == Some(sym.id.as_str())
            });
            if !points_here {
                continue;
            }
            // Same-file references to properties are noise (accessors,
            // initializers), not structure.
            if sym.kind == SymbolKind::Property && other.id == sym.file_id {
                continue;
            }
            if let Some(r) = symbol_ref(other, s, options) {
                let entries = incoming.entry(other.id).or_default();
                if !entries.contains(&r) {
                    entries.push(r);
                }
            }
        }
    }

    if sym.is_exported {
        for other in all {
            if other.id == sym.file_id || incoming.contains_key(&other.id) {
                continue;
            }
            let imports_this_file = other.file_relationships.iter().any(|r| {
                r.resolved_file_id == Some(sym.file_id) && r.resolved_symbol_id.is_none()
            });
            if imports_this_file {
                incoming
                    .entry(other.id)
                    .or_default()
                    .push(render_ref(other.id, 0, options));
            }
        }
    }

    if incoming.is_empty() {
        return None;
    }
    let parts: Vec<String> = incoming.into_values().map(|v| v.join(", ")).collect();
    Some(format!("<- {}", parts.join(", ")))
}

fn header_line(file: &SourceFile, options: &ResolvedOptions) -> String {
    let mut parts: Vec<String> = Vec::new();
    if options.show_file_prefix {
        parts.push("§".into());
    }
    if options.show_file_ids {
        parts.push(format!("({})", file.id));
    }
    parts.push(file.relative_path.clone());
    parts.join(" ")
}

fn format_file(file: &SourceFile, all: &[SourceFile], options: &ResolvedOptions) -> String {
    // Error and blank stubs short-circuit everything else.
    if file.parse_error {
        return format!("{} [error]", header_line(file, options));
    }
    if file.source.trim().is_empty() {
        return header_line(file, options);
    }

    let mut header = header_line(file, options);
    if options.show_tags {
        let mut tags: Vec<String> = Vec::new();
        if file.is_generated {
            tags.push("generated".into());
        }
        tags.extend(file.language_directives.iter().cloned());
        if !tags.is_empty() {
            header.push_str(&format!(" [{}]", tags.join(" ")));
        }
    }
    let mut lines = vec![header];

    if options.show_outgoing {
        let mut seen = BTreeSet::new();
        let mut out: Vec<String> = Vec::new();
        for rel in &file.file_relationships {
            let Some(fid) = rel.resolved_file_id else { continue };
            if fid == file.id {
                continue;
            }
            // File-level edges always point at the file itself, even when
            // resolution found a specific symbol behind the import.
            let mut text = render_ref(fid, 0, options);
            if rel.kind == RelationshipKind::DynamicImport && options.show_tags {
                text.push_str(" [dynamic]");
            }
            if seen.insert(text.clone()) {
                out.push(text);
            }
        }
        if !out.is_empty() {
            lines.push(format!("  -> {}", out.join(", ")));
        }
    }

    if options.show_incoming {
        let mut seen = BTreeSet::new();
        let mut inc: Vec<String> = Vec::new();
        for other in all {
            if other.id == file.id {
                continue;
            }
            if other
                .file_relationships
                .iter()
                .any(|r| r.resolved_file_id == Some(file.id))
            {
                let text = render_ref(other.id, 0, options);
                if seen.insert(text.clone()) {
                    inc.push(text);
                }
            }
        }
        if !inc.is_empty() {
            lines.push(format!("  <- {}", inc.join(", ")));
        }
    }

    let mut selected: Vec<&CodeSymbol> = file
        .symbols
        .iter()
        .filter(|s| options.filter_allows(s.kind.as_str()))
        .filter(|s| !options.show_only_exports || s.is_exported)
        .collect();

    // Files with no exports are entry points: only symbols that reach
    // out to other files are interesting.
    if !file.has_exported_symbols() {
        selected.retain(|s| {
            s.dependencies
                .iter()
                .any(|d| d.resolved_file_id.is_some_and(|f| f != file.id))
        });
    }

    // When filtering leaves nothing to show, collapse every symbol's
    // cross-file edges onto the header, one line per distinct target.
    if selected.is_empty() && !file.symbols.is_empty() {
        if options.show_outgoing {
            let mut seen = BTreeSet::new();
            for dep in file.symbols.iter().flat_map(|s| s.dependencies.iter()) {
                let Some(fid) = dep.resolved_file_id else { continue };
                if fid == file.id {
                    continue;
                }
                let text = target_ref(fid, dep.resolved_symbol_id.as_deref(), all, options);
                if seen.insert(text.clone()) {
                    lines.push(format!("  -> {text}"));
                }
            }
        }
        return lines.join("\n");
    }

    if options.group_members {
        render_grouped(&selected, file, all, options, &mut lines);
    } else {
        for sym in &selected {
            lines.extend(format_symbol(sym, file, all, options, "  "));
        }
    }

    lines.join("\n")
}

/// Nest member symbols beneath their closest displayed container.
fn render_grouped(
    selected: &[&CodeSymbol],
    file: &SourceFile,
    all: &[SourceFile],
    options: &ResolvedOptions,
    lines: &mut Vec<String>,
) {
    let is_container = |k: SymbolKind| {
        matches!(
            k,
            SymbolKind::Class | SymbolKind::Interface | SymbolKind::ReactComponent
        )
    };

    let mut parent_of: Vec<Option<usize>> = vec![None; selected.len()];
    for (mi, member) in selected.iter().enumerate() {
        if !member.kind.is_member() {
            continue;
        }
        let mut best: Option<(usize, usize)> = None;
        for (ci, container) in selected.iter().enumerate() {
            if ci == mi || !is_container(container.kind) {
                continue;
            }
            if container.scope_range.contains(&member.range) {
                let span = container.scope_range.line_span();
                if best.map_or(true, |(s, _)| span < s) {
                    best = Some((span, ci));
                }
            }
        }
        parent_of[mi] = best.map(|(_, ci)| ci);
    }

    let mut members_of: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (mi, parent) in parent_of.iter().enumerate() {
        if let Some(ci) = parent {
            members_of.entry(*ci).or_default().push(mi);
        }
    }

    for (i, sym) in selected.iter().enumerate() {
        if parent_of[i].is_some() {
            continue;
        }
        lines.extend(format_symbol(sym, file, all, options, "  "));
        if let Some(members) = members_of.get(&i) {
            for &mi in members {
                lines.extend(format_symbol(selected[mi], file, all, options, "    "));
            }
        }
    }
}
