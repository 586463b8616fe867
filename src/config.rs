//! Project configuration loaded from `scn.yaml`.
//!
//! Everything here is optional: the CLI runs fine without a config file,
//! and every field can be overridden by a flag.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScnError};
use crate::options::FormattingOptions;

/// File names probed by [`discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["scn.yaml", ".scn.yaml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScnConfig {
    /// Project root used for import resolution; defaults to `/`.
    pub root: Option<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Import-alias map, tsconfig style: at most one `*` per pattern,
    /// substituted into the target's `*`. Targets are root-relative.
    pub paths: BTreeMap<String, String>,
    pub format: FormattingOptions,
}

impl ScnConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_yaml::from_str(&text).map_err(|source| ScnError::Config {
            path: path.display().to_string(),
            source,
        })
    }

    /// Look for a config file directly under `dir`.
    pub fn discover(dir: &Path) -> Result<Option<(PathBuf, Self)>> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((candidate, config)));
            }
        }
        Ok(None)
    }

    /// Alias resolver over the `paths` map, suitable for
    /// [`resolve_graph`](crate::resolve::resolve_graph). First matching
    /// pattern wins; exact entries beat wildcards only by map order.
    pub fn path_resolver(&self) -> impl Fn(&str) -> Option<String> + Send + Sync + '_ {
        move |specifier: &str| {
            for (pattern, target) in &self.paths {
                if let Some(resolved) = apply_alias(pattern, target, specifier) {
                    return Some(resolved);
                }
            }
            None
        }
    }
}

/// Match `specifier` against one alias pattern and substitute into its
/// target. Patterns without `*` must match exactly.
fn apply_alias(pattern: &str, target: &str, specifier: &str) -> Option<String> {
    match pattern.split_once('*') {
        None => (pattern == specifier).then(|| target.to_string()),
        Some((prefix, suffix)) => {
            let rest = specifier.strip_prefix(prefix)?.strip_suffix(suffix)?;
            Some(match target.split_once('*') {
                None => target.to_string(),
                Some((tp, ts)) => format!("{tp}{rest}{ts}"),
            })
        }
    }
}
