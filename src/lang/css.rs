//! CSS grammar configuration.

use tree_sitter::Language;

pub fn language() -> Language {
    tree_sitter_css::LANGUAGE.into()
}

/// Selector tokens become symbols named after themselves; at-rules become
/// symbols named by their full prelude (text up to the rule body). Custom
/// properties (`--x`) are picked out of plain declarations by prefix, and
/// `var(--x)` arguments become usage relationships back to them.
const QUERY: &str = r#"
(class_selector
  (class_name) @symbol.css_class.def)

(id_selector
  (id_name) @symbol.css_id.def)

(tag_name) @symbol.css_tag.def

[
  (media_statement)
  (keyframes_statement)
  (supports_statement)
  (at_rule)
] @symbol.css_at_rule.def

((declaration
  (property_name) @symbol.css_variable.def)
  (#match? @symbol.css_variable.def "^--"))

((call_expression
  (function_name) @_fn
  (arguments (plain_value) @rel.css_variable.ref))
  (#eq? @_fn "var"))
"#;

pub fn query() -> &'static str {
    QUERY
}
