//! Rust grammar configuration.
//!
//! Named `rust_lang` because `rust` is a reserved module path prefix in
//! some tooling contexts.

use tree_sitter::Language;

pub fn language() -> Language {
    tree_sitter_rust::LANGUAGE.into()
}

/// `impl_item` is captured on the construct itself so the analyzer can
/// synthesize an `impl Trait for Type` display name from its fields.
const QUERY: &str = r#"
(struct_item
  name: (type_identifier) @symbol.rust_struct.def)

(trait_item
  name: (type_identifier) @symbol.rust_trait.def)

(impl_item) @symbol.rust_impl.def

(function_item
  name: (identifier) @symbol.function.def)

; '#[derive(..)]' and friends; resolved macros are rare, unresolved ones
; render as 'name [macro]'
(attribute_item
  (attribute (identifier) @rel.macro))

(call_expression
  function: (identifier) @rel.call)
"#;

pub fn query() -> &'static str {
    QUERY
}
