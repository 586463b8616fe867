//! Formatting options, presets, and token-impact reporting.
//!
//! [`FormattingOptions`] is the sparse user-facing record: every field is
//! optional so explicit settings can overlay a preset. [`ResolvedOptions`]
//! is the dense form the formatter actually reads.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::format;
use crate::model::SourceFile;

/// Named option bundles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Default,
    Minimal,
    Compact,
    Detailed,
    Verbose,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Preset::Default),
            "minimal" => Ok(Preset::Minimal),
            "compact" => Ok(Preset::Compact),
            "detailed" => Ok(Preset::Detailed),
            "verbose" => Ok(Preset::Verbose),
            other => Err(format!("unknown preset '{other}'")),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Preset::Default => "default",
            Preset::Minimal => "minimal",
            Preset::Compact => "compact",
            Preset::Detailed => "detailed",
            Preset::Verbose => "verbose",
        };
        f.write_str(name)
    }
}

impl Preset {
    /// The dense option set this preset stands for.
    pub fn options(self) -> ResolvedOptions {
        let mut opts = ResolvedOptions::default();
        match self {
            Preset::Default => {}
            Preset::Minimal => {
                opts.show_icons = false;
                opts.show_exported_indicator = false;
                opts.show_private_indicator = false;
                opts.show_modifiers = false;
                opts.show_tags = false;
                opts.show_symbol_ids = false;
                opts.group_members = false;
                opts.display_filters.insert("*".into(), false);
            }
            Preset::Compact => {
                opts.show_private_indicator = false;
                opts.show_modifiers = false;
                opts.show_tags = false;
                opts.show_symbol_ids = false;
                opts.show_only_exports = true;
                for kind in ["property", "method", "constructor", "enum_member"] {
                    opts.display_filters.insert(kind.into(), false);
                }
            }
            Preset::Detailed => {
                opts.group_members = false;
            }
            Preset::Verbose => {
                opts.group_members = false;
                opts.display_filters.insert("*".into(), true);
            }
        }
        opts
    }
}

/// Sparse, user-facing option record: unset fields fall back to the
/// preset (or the defaults when no preset is named).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormattingOptions {
    pub preset: Option<Preset>,
    pub show_outgoing: Option<bool>,
    pub show_incoming: Option<bool>,
    pub show_icons: Option<bool>,
    pub show_exported_indicator: Option<bool>,
    pub show_private_indicator: Option<bool>,
    pub show_modifiers: Option<bool>,
    pub show_tags: Option<bool>,
    pub show_symbol_ids: Option<bool>,
    pub group_members: Option<bool>,
    pub show_file_prefix: Option<bool>,
    pub show_file_ids: Option<bool>,
    pub show_only_exports: Option<bool>,
    /// Symbol kind (or `"*"`) to visibility. Replaces, not merges, the
    /// preset's filter map when set.
    pub display_filters: Option<BTreeMap<String, bool>>,
}

impl FormattingOptions {
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset: Some(preset),
            ..Self::default()
        }
    }

    /// Shallow merge: start from the preset's bundle, overlay every
    /// explicitly set field.
    pub fn resolve(&self) -> ResolvedOptions {
        let mut opts = self.preset.unwrap_or_default().options();
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if let Some(v) = self.$field { opts.$field = v; })*
            };
        }
        overlay!(
            show_outgoing,
            show_incoming,
            show_icons,
            show_exported_indicator,
            show_private_indicator,
            show_modifiers,
            show_tags,
            show_symbol_ids,
            group_members,
            show_file_prefix,
            show_file_ids,
            show_only_exports
        );
        if let Some(filters) = &self.display_filters {
            opts.display_filters = filters.clone();
        }
        opts
    }
}

/// Every display toggle, fully determined.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub show_outgoing: bool,
    pub show_incoming: bool,
    pub show_icons: bool,
    pub show_exported_indicator: bool,
    pub show_private_indicator: bool,
    pub show_modifiers: bool,
    pub show_tags: bool,
    pub show_symbol_ids: bool,
    pub group_members: bool,
    pub show_file_prefix: bool,
    pub show_file_ids: bool,
    pub show_only_exports: bool,
    pub display_filters: BTreeMap<String, bool>,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            show_outgoing: true,
            show_incoming: true,
            show_icons: true,
            show_exported_indicator: true,
            show_private_indicator: true,
            show_modifiers: true,
            show_tags: true,
            show_symbol_ids: true,
            group_members: true,
            show_file_prefix: true,
            show_file_ids: true,
            show_only_exports: false,
            display_filters: BTreeMap::new(),
        }
    }
}

impl ResolvedOptions {
    /// Filter lookup: exact kind entry, then the `"*"` wildcard, then
    /// visible by default.
    pub fn filter_allows(&self, kind: &str) -> bool {
        self.display_filters
            .get(kind)
            .or_else(|| self.display_filters.get("*"))
            .copied()
            .unwrap_or(true)
    }
}

/// Counts tokens for impact reporting. The formatter itself never needs
/// one; this seam exists so callers can plug in a real model tokenizer.
pub trait Tokenizer {
    fn count(&self, text: &str) -> usize;
}

/// Four characters per token, rounded up. Close enough for deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharEstimator;

impl Tokenizer for CharEstimator {
    fn count(&self, text: &str) -> usize {
        (text.chars().count() + 3) / 4
    }
}

/// Token delta for each toggleable option and each symbol-kind filter,
/// relative to a base option set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenImpact {
    pub base_tokens: usize,
    pub options: BTreeMap<String, i64>,
    pub display_filters: BTreeMap<String, i64>,
}

const SIMPLE_TOGGLES: [&str; 11] = [
    "show_outgoing",
    "show_incoming",
    "show_icons",
    "show_exported_indicator",
    "show_private_indicator",
    "show_modifiers",
    "show_tags",
    "show_symbol_ids",
    "group_members",
    "show_file_prefix",
    "show_file_ids",
];

fn flip(base: &ResolvedOptions, key: &str) -> ResolvedOptions {
    let mut opts = base.clone();
    match key {
        "show_outgoing" => opts.show_outgoing = !opts.show_outgoing,
        "show_incoming" => opts.show_incoming = !opts.show_incoming,
        "show_icons" => opts.show_icons = !opts.show_icons,
        "show_exported_indicator" => {
            opts.show_exported_indicator = !opts.show_exported_indicator
        }
        "show_private_indicator" => opts.show_private_indicator = !opts.show_private_indicator,
        "show_modifiers" => opts.show_modifiers = !opts.show_modifiers,
        "show_tags" => opts.show_tags = !opts.show_tags,
        "show_symbol_ids" => opts.show_symbol_ids = !opts.show_symbol_ids,
        "group_members" => opts.group_members = !opts.group_members,
        "show_file_prefix" => opts.show_file_prefix = !opts.show_file_prefix,
        "show_file_ids" => opts.show_file_ids = !opts.show_file_ids,
        _ => {}
    }
    opts
}

/// Re-render the project once per toggle and report how many tokens each
/// flip would add or save. Quadratic in output size, so callers opt in.
pub fn token_impact(
    files: &[SourceFile],
    base: &FormattingOptions,
    tokenizer: &dyn Tokenizer,
) -> TokenImpact {
    let start = std::time::Instant::now();
    let resolved = base.resolve();
    let base_tokens = tokenizer.count(&format::format_scn(files, &resolved)) as i64;

    let mut impact = TokenImpact {
        base_tokens: base_tokens as usize,
        ..TokenImpact::default()
    };

    for key in SIMPLE_TOGGLES {
        let flipped = flip(&resolved, key);
        let tokens = tokenizer.count(&format::format_scn(files, &flipped)) as i64;
        impact.options.insert(key.to_string(), tokens - base_tokens);
    }

    let kinds: BTreeSet<&'static str> = files
        .iter()
        .flat_map(|f| f.symbols.iter().map(|s| s.kind.as_str()))
        .collect();
    for kind in kinds {
        let mut flipped = resolved.clone();
        let current = flipped.filter_allows(kind);
        flipped.display_filters.insert(kind.to_string(), !current);
        let tokens = tokenizer.count(&format::format_scn(files, &flipped)) as i64;
        impact
            .display_filters
            .insert(kind.to_string(), tokens - base_tokens);
    }

    tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "token impact computed");
    impact
}
