//! TypeScript / TSX / JavaScript grammar configuration.
//!
//! JavaScript and JSX files share the TSX grammar, which is a superset of
//! both. The base query covers plain TypeScript; TSX appends JSX element
//! definitions, JSX usage relationships, and render-prop arrow functions.

use once_cell::sync::Lazy;
use tree_sitter::Language;

pub fn typescript_language() -> Language {
    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
}

pub fn tsx_language() -> Language {
    tree_sitter_typescript::LANGUAGE_TSX.into()
}

/// Capture query for plain TypeScript.
///
/// Capture names follow `category.kind.role`:
/// - `symbol.<kind>.def` creates a symbol,
/// - `rel.<kind>` records a relationship,
/// - `mod.<kind>` mutates the nearest enclosing symbol,
/// - anything else (helper captures, `_`-prefixed) is ignored.
const TS_BASE_QUERY: &str = r#"
; =============================================
; Definitions
; =============================================

(function_declaration
  name: (identifier) @symbol.function.def)

(method_definition
  name: (property_identifier) @symbol.method.def)

; Constructors are additionally captured as plain methods by the pattern
; above; the analyzer filters that duplicate out.
((method_definition
  name: (property_identifier) @symbol.constructor.def)
  (#eq? @symbol.constructor.def "constructor"))

(class_declaration
  name: (type_identifier) @symbol.class.def)

(abstract_class_declaration
  name: (type_identifier) @symbol.class.def)

(interface_declaration
  name: (type_identifier) @symbol.interface.def)

(enum_declaration
  name: (identifier) @symbol.enum.def)

(enum_body
  (property_identifier) @symbol.enum_member.def)

(enum_assignment
  name: (property_identifier) @symbol.enum_member.def)

(type_alias_declaration
  name: (type_identifier) @symbol.type_alias.def)

; 'export const MyVar = ...' or 'const MyVar = ...'
(variable_declarator
  name: (identifier) @symbol.variable.def)

; Class fields and interface members
(public_field_definition
  name: (property_identifier) @symbol.property.def)

(property_signature
  name: (property_identifier) @symbol.property.def)

(method_signature
  name: (property_identifier) @symbol.method.def)

(abstract_method_signature
  name: (property_identifier) @symbol.method.def)

; 'namespace Foo { ... }'
(internal_module
  name: (_) @symbol.module.def)

; =============================================
; Relationships
; =============================================

; Imports: 'import { A, B } from "./foo"'
(import_statement
  source: (string) @rel.import.source)

; require calls: 'const foo = require("./foo")'
((call_expression
  function: (identifier) @_fn
  arguments: (arguments (string) @rel.import.source))
  (#eq? @_fn "require"))

; Dynamic imports: 'import("./foo")'
(call_expression
  function: (import)
  arguments: (arguments (string) @rel.dynamic_import.source))

; 'export { A, B } from "./foo"'
(export_statement
  source: (string) @rel.export.source)

; 'class A extends B'
(class_declaration
  (class_heritage (extends_clause value: (_) @rel.extends)))

; 'class A implements I'
(class_declaration
  (class_heritage (implements_clause (type_identifier) @rel.implements)))

; Function/method calls
(call_expression
  function: (identifier) @rel.call)
(call_expression
  function: (member_expression
    property: (property_identifier) @rel.call))

; Decorators
(decorator
  (identifier) @rel.decorator)
(decorator
  (call_expression
    function: (identifier) @rel.decorator))

; 'new MyClass()'
(new_expression
  constructor: (identifier) @rel.call)
(new_expression
  constructor: (member_expression
    property: (property_identifier) @rel.call))

; Type annotations
(type_annotation
  (type_identifier) @rel.references)
(generic_type
  (type_identifier) @rel.references)

; =============================================
; Modifiers
; =============================================

((export_statement) @mod.export)
((accessibility_modifier) @mod.accessibility)
((method_definition
  "static" @mod.static))
((public_field_definition
  "static" @mod.static))
((public_field_definition
  "readonly" @mod.readonly))
((method_definition
  "async" @mod.async))
((function_declaration
  "async" @mod.async))
((arrow_function
  "async" @mod.async))
"#;

/// JSX additions layered on top of the base query for TSX/JS files.
const TSX_EXTRA_QUERY: &str = r#"
; JSX element definitions
(jsx_opening_element
  name: (_) @symbol.jsx_element.def)

(jsx_self_closing_element
  name: (_) @symbol.jsx_element.def)

; JSX element usage
(jsx_opening_element
  name: (identifier) @rel.call)
(jsx_self_closing_element
  name: (identifier) @rel.call)

; Render props: '<List render={(item) => <Row/>}/>'
(jsx_expression
  (arrow_function) @symbol.function.def)
"#;

static TSX_QUERY: Lazy<String> =
    Lazy::new(|| format!("{TS_BASE_QUERY}\n{TSX_EXTRA_QUERY}"));

pub fn typescript_query() -> &'static str {
    TS_BASE_QUERY
}

pub fn tsx_query() -> &'static str {
    &TSX_QUERY
}
