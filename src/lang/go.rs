//! Go grammar configuration.

use tree_sitter::Language;

pub fn language() -> Language {
    tree_sitter_go::LANGUAGE.into()
}

const QUERY: &str = r#"
(package_clause
  (package_identifier) @symbol.go_package.def)

(function_declaration
  name: (identifier) @symbol.function.def)

(method_declaration
  name: (field_identifier) @symbol.method.def)

; 'go worker()' spawns are tagged separately from plain calls
(go_statement
  (call_expression
    function: (identifier) @rel.goroutine))

(call_expression
  function: (identifier) @rel.call)
(call_expression
  function: (selector_expression
    field: (field_identifier) @rel.call))

(import_spec
  (interpreted_string_literal) @rel.import.source)
"#;

pub fn query() -> &'static str {
    QUERY
}
