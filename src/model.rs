//! The SCN data model: files, symbols, and relationships.
//!
//! These records are created once per pipeline invocation, mutated in place
//! by each stage, and read-only once rendering begins. They carry serde
//! derives so the CLI can dump the resolved model as JSON.

use serde::{Deserialize, Serialize};

use crate::span::Range;

/// Closed vocabulary of symbol kinds the capture interpreter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Interface,
    Function,
    Method,
    Constructor,
    Variable,
    Property,
    Enum,
    EnumMember,
    TypeAlias,
    Module,
    ReactComponent,
    StyledComponent,
    JsxElement,
    CssClass,
    CssId,
    CssTag,
    CssAtRule,
    CssVariable,
    GoPackage,
    RustStruct,
    RustTrait,
    RustImpl,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Variable => "variable",
            SymbolKind::Property => "property",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumMember => "enum_member",
            SymbolKind::TypeAlias => "type_alias",
            SymbolKind::Module => "module",
            SymbolKind::ReactComponent => "react_component",
            SymbolKind::StyledComponent => "styled_component",
            SymbolKind::JsxElement => "jsx_element",
            SymbolKind::CssClass => "css_class",
            SymbolKind::CssId => "css_id",
            SymbolKind::CssTag => "css_tag",
            SymbolKind::CssAtRule => "css_at_rule",
            SymbolKind::CssVariable => "css_variable",
            SymbolKind::GoPackage => "go_package",
            SymbolKind::RustStruct => "rust_struct",
            SymbolKind::RustTrait => "rust_trait",
            SymbolKind::RustImpl => "rust_impl",
        }
    }

    /// Parse the `kind` segment of a `symbol.<kind>.def` capture name.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "class" => SymbolKind::Class,
            "interface" => SymbolKind::Interface,
            "function" => SymbolKind::Function,
            "method" => SymbolKind::Method,
            "constructor" => SymbolKind::Constructor,
            "variable" => SymbolKind::Variable,
            "property" => SymbolKind::Property,
            "enum" => SymbolKind::Enum,
            "enum_member" => SymbolKind::EnumMember,
            "type_alias" => SymbolKind::TypeAlias,
            "module" => SymbolKind::Module,
            "react_component" => SymbolKind::ReactComponent,
            "styled_component" => SymbolKind::StyledComponent,
            "jsx_element" => SymbolKind::JsxElement,
            "css_class" => SymbolKind::CssClass,
            "css_id" => SymbolKind::CssId,
            "css_tag" => SymbolKind::CssTag,
            "css_at_rule" => SymbolKind::CssAtRule,
            "css_variable" => SymbolKind::CssVariable,
            "go_package" => SymbolKind::GoPackage,
            "rust_struct" => SymbolKind::RustStruct,
            "rust_trait" => SymbolKind::RustTrait,
            "rust_impl" => SymbolKind::RustImpl,
            _ => return None,
        })
    }

    /// True for class/interface member kinds subject to grouping and
    /// default-visibility inheritance.
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            SymbolKind::Method | SymbolKind::Constructor | SymbolKind::Property
        )
    }
}

/// Kind of reference a [`Relationship`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Import,
    DynamicImport,
    Export,
    Call,
    Extends,
    Implements,
    References,
    Goroutine,
    Macro,
    Decorator,
    CssVariable,
}

impl RelationshipKind {
    /// Parse the `kind` segment of a `rel.<kind>` capture name.
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "import" => RelationshipKind::Import,
            "dynamic_import" => RelationshipKind::DynamicImport,
            "export" => RelationshipKind::Export,
            "call" => RelationshipKind::Call,
            "extends" => RelationshipKind::Extends,
            "implements" => RelationshipKind::Implements,
            "references" => RelationshipKind::References,
            "goroutine" => RelationshipKind::Goroutine,
            "macro" => RelationshipKind::Macro,
            "decorator" => RelationshipKind::Decorator,
            "css_variable" => RelationshipKind::CssVariable,
            _ => return None,
        })
    }

    /// Imports bring other files' exported names into scope; the resolver
    /// walks these when chasing a name across files.
    pub fn is_import(&self) -> bool {
        matches!(self, RelationshipKind::Import | RelationshipKind::DynamicImport)
    }
}

/// Accessibility keyword on a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    Public,
    Private,
    Protected,
}

/// A reference from a symbol (or a whole file) to another name.
///
/// `resolved_file_id` / `resolved_symbol_id` stay `None` until the
/// cross-file resolver succeeds; an unresolved relationship is not an
/// error, it is simply omitted (or tagged) by the formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    /// Raw referenced identifier or import path, quote-stripped.
    pub target_name: String,
    /// Span of the reference, used to find its owning symbol.
    pub range: Range,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_file_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_symbol_id: Option<String>,
}

impl Relationship {
    pub fn new(kind: RelationshipKind, target_name: String, range: Range) -> Self {
        Self {
            kind,
            target_name,
            range,
            resolved_file_id: None,
            resolved_symbol_id: None,
        }
    }
}

/// A declared entity: class, function, property, CSS rule, impl block...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSymbol {
    /// Position-derived id, `line:column` of the name range start
    /// (1-indexed line). Unique within a file without a global counter.
    pub id: String,
    pub file_id: u32,
    pub name: String,
    pub kind: SymbolKind,
    /// Span of the symbol's name/head.
    pub range: Range,
    /// Span of the full defining construct; used only for containment
    /// tests, never for display. Invariant: contains `range`.
    pub scope_range: Range,
    pub is_exported: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_readonly: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_async: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_pure: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub throws: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<Accessibility>,
    /// Normalized `(params): #ret` signature for callables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Normalized `#type` annotation for properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annotation: Option<String>,
    /// Normalized right-hand side for type aliases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_alias_value: Option<String>,
    /// Tag name behind a styled component (`div` for `styled.div`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styled_tag: Option<String>,
    /// Free-form tags attached post-hoc ("abstract", "symbol", "proxy").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Relationship>,
}

impl CodeSymbol {
    pub fn new(file_id: u32, name: String, kind: SymbolKind, range: Range, scope_range: Range) -> Self {
        Self {
            id: format!("{}:{}", range.start.line + 1, range.start.column),
            file_id,
            name,
            kind,
            range,
            scope_range,
            is_exported: false,
            is_static: false,
            is_abstract: false,
            is_readonly: false,
            is_async: false,
            is_pure: false,
            throws: false,
            accessibility: None,
            signature: None,
            type_annotation: None,
            type_alias_value: None,
            styled_tag: None,
            labels: Vec::new(),
            dependencies: Vec::new(),
        }
    }
}

/// One analyzed input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Dense id assigned in input order starting at 1.
    pub id: u32,
    /// Slash-normalized path relative to the project root; the stable
    /// cross-file identity key.
    pub relative_path: String,
    pub absolute_path: String,
    /// Raw text, owned. Skipped in JSON dumps.
    #[serde(skip)]
    pub source: String,
    /// Symbols in ascending (line, column) order of their name ranges.
    pub symbols: Vec<CodeSymbol>,
    /// Relationships that could not be attached to any symbol, typically
    /// whole-file imports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub parse_error: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_generated: bool,
    /// Leading string-literal directives such as `"use client"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub language_directives: Vec<String>,
}

impl SourceFile {
    pub fn new(id: u32, relative_path: String, absolute_path: String, source: String) -> Self {
        Self {
            id,
            relative_path,
            absolute_path,
            source,
            symbols: Vec::new(),
            file_relationships: Vec::new(),
            parse_error: false,
            is_generated: false,
            language_directives: Vec::new(),
        }
    }

    /// Find a symbol by its position-derived id.
    pub fn symbol_by_id(&self, id: &str) -> Option<&CodeSymbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    pub fn has_exported_symbols(&self) -> bool {
        self.symbols.iter().any(|s| s.is_exported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Pos;

    #[test]
    fn test_symbol_id_is_one_indexed_line() {
        let range = Range::new(Pos::new(0, 4), Pos::new(0, 7));
        let sym = CodeSymbol::new(1, "foo".into(), SymbolKind::Function, range, range);
        assert_eq!(sym.id, "1:4");
    }

    #[test]
    fn test_kind_round_trips_through_strings() {
        for kind in [
            SymbolKind::Class,
            SymbolKind::EnumMember,
            SymbolKind::ReactComponent,
            SymbolKind::CssAtRule,
            SymbolKind::RustImpl,
        ] {
            assert_eq!(SymbolKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(SymbolKind::parse("not_a_kind"), None);
    }

    #[test]
    fn test_relationship_kind_parse() {
        assert_eq!(
            RelationshipKind::parse("dynamic_import"),
            Some(RelationshipKind::DynamicImport)
        );
        assert!(RelationshipKind::parse("dynamic_import").unwrap().is_import());
        assert!(!RelationshipKind::parse("call").unwrap().is_import());
    }
}
