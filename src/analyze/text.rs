//! Textual attribute extraction.
//!
//! Types, signatures, and modifier keywords are read from the raw text of
//! the defining scope rather than from deeper tree-sitter captures. This
//! keeps the queries small and tolerates partially broken sources: a
//! regex over the scope text still works inside an ERROR subtree.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::model::{Accessibility, CodeSymbol, SymbolKind};

static ACCESSIBILITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(public|private|protected)\b").unwrap());
static PROPERTY_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*([^;\n]+)").unwrap());
static READONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\breadonly\b").unwrap());
static LEADING_STATIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*static\b").unwrap());
static ABSTRACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\babstract\b").unwrap());
static ALIAS_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"=\s*([^;\n]+)").unwrap());
static SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^']+)'").unwrap());
static DOUBLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());
static MAPPED_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*([^:]+?)\s+in\s+([^:\]]+)\s*\]\s*:\s*(.*)").unwrap());
static PARAMS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]*)\)").unwrap());
static PARAM_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*([^,]+)").unwrap());
static RETURN_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\)\s*:\s*([^\{\n]+)").unwrap());
static ASYNC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\basync\b").unwrap());
static THROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bthrow\b").unwrap());
static UNION_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\|\s*").unwrap());
static OPTIONAL_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\?\s*").unwrap());
static COLON_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*:\s*").unwrap());

/// Compact a type expression: trim, drop a trailing semicolon, and close
/// up whitespace around `|`, `?`, and `:`.
pub fn normalize_type(t: &str) -> String {
    let cleaned = t.trim().trim_end_matches(';').trim_end();
    let cleaned = UNION_SPACES.replace_all(cleaned, "|");
    let cleaned = OPTIONAL_SPACES.replace_all(&cleaned, "?");
    COLON_SPACES.replace_all(&cleaned, ":").into_owned()
}

/// Fill in a freshly created symbol's type/signature/modifier fields from
/// the text of its defining scope.
pub fn apply(symbol: &mut CodeSymbol, scope_text: &str) {
    if symbol.kind.is_member() {
        if let Some(caps) = ACCESSIBILITY.captures(scope_text) {
            symbol.accessibility = Some(match &caps[1] {
                "private" => Accessibility::Private,
                "protected" => Accessibility::Protected,
                _ => Accessibility::Public,
            });
        }
    }

    if symbol.kind == SymbolKind::Property {
        if let Some(caps) = PROPERTY_TYPE.captures(scope_text) {
            symbol.type_annotation = Some(format!("#{}", normalize_type(&caps[1])));
        }
        symbol.is_readonly |= READONLY.is_match(scope_text);
        symbol.is_static |= LEADING_STATIC.is_match(scope_text);
    }

    if matches!(symbol.kind, SymbolKind::Class | SymbolKind::Method)
        && ABSTRACT.is_match(scope_text)
    {
        symbol.is_abstract = true;
    }

    if symbol.kind == SymbolKind::TypeAlias {
        if let Some(caps) = ALIAS_VALUE.captures(scope_text) {
            symbol.type_alias_value = Some(format!("#{}", alias_value(&caps[1])));
        }
    }

    if matches!(
        symbol.kind,
        SymbolKind::Function | SymbolKind::Method | SymbolKind::Constructor
    ) {
        symbol.signature = Some(signature(scope_text));
        symbol.is_async |= ASYNC.is_match(scope_text);
        symbol.throws |= THROW.is_match(scope_text);
        symbol.is_static |= LEADING_STATIC.is_match(scope_text);
    }
}

/// Right-hand side of a type alias: quotes stripped from literal unions,
/// mapped types collapsed to `K in Keys:V`.
fn alias_value(raw: &str) -> String {
    let mut value = normalize_type(raw);
    value = SINGLE_QUOTED.replace_all(&value, "$1").into_owned();
    value = DOUBLE_QUOTED.replace_all(&value, "$1").into_owned();

    if value.starts_with('{') && value.ends_with('}') {
        let inner = value[1..value.len() - 1].trim();
        if let Some(caps) = MAPPED_TYPE.captures(inner) {
            value = format!(
                "{} in {}:{}",
                caps[1].trim(),
                caps[2].trim(),
                caps[3].trim()
            );
        }
    }
    value
}

/// `(name: #Type, other: #Type): #Ret` from the scope text of a callable.
fn signature(scope_text: &str) -> String {
    let params_raw = PARAMS
        .captures(scope_text)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    let params = params_raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            PARAM_TYPE
                .replace(p, |caps: &Captures| format!(": #{}", normalize_type(&caps[1])))
                .into_owned()
        })
        .collect::<Vec<_>>()
        .join(", ");
    let ret = RETURN_TYPE
        .captures(scope_text)
        .map(|c| format!(": #{}", normalize_type(&c[1])))
        .unwrap_or_default();
    format!("({params}){ret}")
}
