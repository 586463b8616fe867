//! Whole-project analysis pipeline.
//!
//! Drives the stages in order: source-file creation, glob filtering,
//! parsing, capture interpretation, and cross-file resolution. Between
//! stages (and between files within a stage) it checks the caller's
//! cancel token and reports progress, so long analyses stay responsive
//! without any threads of their own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::analyze;
use crate::error::{Result, ScnError};
use crate::lang::{self, LanguageConfig};
use crate::model::SourceFile;
use crate::parse;
use crate::paths;
use crate::resolve::{self, PathResolver};

/// One input file, path relative to the project root.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: String,
    pub content: String,
}

/// Stage-boundary progress report.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub percentage: f64,
    pub message: String,
}

pub type ProgressFn<'a> = dyn Fn(Progress) + Send + Sync + 'a;

/// Cooperative cancellation flag, cheap to clone across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Caller-facing knobs for [`analyze_project`].
pub struct ProjectOptions<'a> {
    /// Absolute project root; input paths are joined onto it.
    pub root: String,
    /// Glob patterns over relative paths; empty means include all.
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Import-alias expansion, usually built from config `paths`.
    pub path_resolver: Option<&'a PathResolver<'a>>,
    pub on_progress: Option<&'a ProgressFn<'a>>,
    pub cancel: Option<&'a CancelToken>,
}

impl Default for ProjectOptions<'_> {
    fn default() -> Self {
        Self {
            root: "/".to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
            path_resolver: None,
            on_progress: None,
            cancel: None,
        }
    }
}

/// A fully analyzed and resolved project.
#[derive(Debug)]
pub struct Analysis {
    pub files: Vec<SourceFile>,
    pub analysis_time: Duration,
}

/// Run the full pipeline over in-memory file contents.
pub fn analyze_project(inputs: Vec<InputFile>, options: &ProjectOptions) -> Result<Analysis> {
    let start = Instant::now();
    tracing::info!(files = inputs.len(), "starting analysis");

    let report = |percentage: f64, message: String| {
        if let Some(cb) = options.on_progress {
            cb(Progress { percentage, message });
        }
    };
    let check = || -> Result<()> {
        if options.cancel.map_or(false, CancelToken::is_cancelled) {
            Err(ScnError::Cancelled)
        } else {
            Ok(())
        }
    };

    report(0.0, "Creating source files...".to_string());
    let mut files: Vec<SourceFile> = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.into_iter().enumerate() {
        check()?;
        let absolute = paths::join(&[&options.root, &input.path]);
        files.push(SourceFile::new(
            (i + 1) as u32,
            input.path,
            absolute,
            input.content,
        ));
    }

    if !options.include.is_empty() || !options.exclude.is_empty() {
        let include = build_globset(&options.include)?;
        let exclude = build_globset(&options.exclude)?;
        let before = files.len();
        files.retain(|f| {
            let included = include.as_ref().map_or(true, |g| g.is_match(&f.relative_path));
            let excluded = exclude.as_ref().map_or(false, |g| g.is_match(&f.relative_path));
            included && !excluded
        });
        tracing::info!(before, after = files.len(), "applied glob filters");
    }

    report(10.0, format!("Parsing {} files...", files.len()));
    let total = files.len().max(1) as f64;
    let mut trees: Vec<Option<(tree_sitter::Tree, &'static LanguageConfig)>> =
        Vec::with_capacity(files.len());
    for i in 0..files.len() {
        check()?;
        let parsed = match lang::for_path(&files[i].relative_path) {
            Some(config) if !files[i].source.trim().is_empty() => {
                tracing::debug!(path = %files[i].relative_path, "parsing");
                match parse::parse_source(config, &files[i].source) {
                    Some(tree) => Some((tree, config)),
                    None => {
                        files[i].parse_error = true;
                        tracing::warn!(path = %files[i].relative_path, "failed to parse");
                        None
                    }
                }
            }
            _ => None,
        };
        trees.push(parsed);
        report(
            10.0 + 40.0 * (i + 1) as f64 / total,
            format!("Parsing {}", files[i].relative_path),
        );
    }

    report(50.0, "Analyzing files...".to_string());
    for i in 0..files.len() {
        check()?;
        if let Some((tree, config)) = &trees[i] {
            tracing::debug!(path = %files[i].relative_path, "analyzing");
            analyze::analyze_file(&mut files[i], tree, config);
            report(
                50.0 + 40.0 * (i + 1) as f64 / total,
                format!("Analyzing {}", files[i].relative_path),
            );
        }
    }

    report(90.0, "Resolving dependency graph...".to_string());
    check()?;
    let default_resolver: &PathResolver<'_> = &resolve::no_aliases;
    let resolver = options.path_resolver.unwrap_or(default_resolver);
    resolve::resolve_graph(&mut files, resolver, &options.root);

    report(100.0, "Analysis complete.".to_string());
    let analysis_time = start.elapsed();
    tracing::info!(elapsed_ms = analysis_time.as_millis() as u64, "analysis finished");
    Ok(Analysis {
        files,
        analysis_time,
    })
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ScnError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|source| ScnError::InvalidGlob {
        pattern: patterns.join(","),
        source,
    })?;
    Ok(Some(set))
}
