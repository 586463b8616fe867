//! Display-name synthesis for captured nodes.
//!
//! Most symbols are captured on their name node and need no work; the
//! interesting cases are constructs with no identifier of their own: CSS
//! rules, at-rules, impl blocks, and anonymous arrow functions.

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

use crate::parse::node_text;

static DESTRUCTURED_PARAMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*\{\s*([^}]+?)\s*\}\s*\)").unwrap());

/// Synthesize the display name for a symbol capture.
pub fn symbol_name(node: &Node, source: &str) -> String {
    match node.kind() {
        // CSS rules and at-rules: the prelude (everything before the
        // body) is the name. '@media (max-width: 600px)', '.card:hover'.
        "rule_set" | "at_rule" | "media_statement" | "keyframes_statement"
        | "supports_statement" => {
            let text = node_text(node, source);
            let prelude = text.split('{').next().unwrap_or(text);
            prelude.trim().trim_end_matches(';').to_string()
        }
        "jsx_opening_element" | "jsx_self_closing_element" => node
            .child_by_field_name("name")
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_else(|| "<fragment>".to_string()),
        // 'impl Display for Config' reads better than a span.
        "impl_item" => {
            let trait_name = node
                .child_by_field_name("trait")
                .map(|n| node_text(&n, source).to_string());
            let type_name = node
                .child_by_field_name("type")
                .map(|n| node_text(&n, source).to_string());
            match (trait_name, type_name) {
                (Some(t), Some(ty)) => format!("impl {t} for {ty}"),
                _ => "impl".to_string(),
            }
        }
        "variable_declarator" => node
            .child_by_field_name("name")
            .map(|n| node_text(&n, source).to_string())
            .unwrap_or_else(|| "<anonymous>".to_string()),
        "arrow_function" => anonymous_name(node, source),
        // Name-node captures (identifiers, selector tokens) name
        // themselves; anything else asks its parent for a name field.
        kind if is_name_leaf(kind) => node_text(node, source).trim().to_string(),
        _ => {
            let owner = node.parent().unwrap_or(*node);
            identifier_name(&owner, source).unwrap_or_else(|| "<anonymous>".to_string())
        }
    }
}

fn is_name_leaf(kind: &str) -> bool {
    matches!(
        kind,
        "identifier"
            | "property_identifier"
            | "type_identifier"
            | "field_identifier"
            | "package_identifier"
            | "class_name"
            | "id_name"
            | "tag_name"
            | "property_name"
    )
}

/// Pull a name out of a declaration node: the `name` field if the grammar
/// has one, otherwise the first identifier child.
fn identifier_name(node: &Node, source: &str) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(node_text(&name, source).to_string());
    }
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "identifier" | "property_identifier"))
        .map(|c| node_text(&c, source).to_string());
    found
}

/// Anonymous arrow functions render as `<anonymous>` plus a compacted
/// parameter list so render props stay distinguishable.
fn anonymous_name(node: &Node, source: &str) -> String {
    let params = match node.child_by_field_name("parameters") {
        Some(p) => node_text(&p, source).to_string(),
        None => return "<anonymous>()".to_string(),
    };
    let clean: String = params.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some(caps) = DESTRUCTURED_PARAMS.captures(&clean) {
        let inner = caps[1]
            .split(',')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(", ");
        return format!("<anonymous>({{ {inner} }})");
    }
    format!("<anonymous>{clean}")
}

/// True when any descendant is a JSX node.
pub fn contains_jsx(node: &Node) -> bool {
    if node.kind().starts_with("jsx_") {
        return true;
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if contains_jsx(&child) {
                return true;
            }
        }
    }
    false
}

/// True when some return statement under `node` yields JSX. Used to
/// promote block-bodied functions to react components.
pub fn contains_jsx_return(node: &Node) -> bool {
    if node.kind() == "return_statement" {
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                if contains_jsx(&child) {
                    return true;
                }
            }
        }
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if contains_jsx_return(&child) {
                return true;
            }
        }
    }
    false
}
