//! Command-line interface for scn.
//!
//! `scn generate` walks a directory, runs the analysis pipeline, and
//! prints (or writes) the SCN map. `scn impact` reports how many tokens
//! each formatting toggle would add or save for the same project.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::ScnConfig;
use crate::format;
use crate::lang;
use crate::options::{self, CharEstimator, FormattingOptions, Preset, Tokenizer};
use crate::project::{self, Analysis, InputFile, Progress, ProjectOptions};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Symbolic Context Notation generator.
///
/// Scn analyzes a polyglot codebase with tree-sitter queries and renders
/// a compact dependency-ordered map of its files, symbols, and
/// relationships, designed to fit a code assistant's context window.
#[derive(Parser)]
#[command(name = "scn")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a project and print its SCN map
    #[command(visible_alias = "gen")]
    Generate(GenerateArgs),
    /// Report the token cost of each formatting option
    Impact(ImpactArgs),
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Path to analyze (file or directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Path to scn.yaml (default: auto-discover in the analyzed directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Formatting preset: default, minimal, compact, detailed, or verbose
    #[arg(short, long)]
    pub preset: Option<Preset>,

    /// Output format: scn or json
    #[arg(short, long, default_value = "scn")]
    pub format: String,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Parser)]
pub struct ImpactArgs {
    /// Path to analyze (file or directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Path to scn.yaml (default: auto-discover in the analyzed directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base preset to measure deltas against
    #[arg(short, long)]
    pub preset: Option<Preset>,
}

/// Directories never worth descending into.
fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.')
        || matches!(name, "node_modules" | "vendor" | "target" | "dist" | "build")
}

/// Walk a directory for supported source files, sorted for stable ids.
fn collect_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir() && is_skipped_dir(&e.file_name().to_string_lossy()))
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if lang::is_supported(ext) {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Read file contents in parallel; invalid UTF-8 is replaced, not fatal.
fn read_inputs(root: &Path, files: &[PathBuf]) -> anyhow::Result<Vec<InputFile>> {
    files
        .par_iter()
        .map(|path| -> anyhow::Result<InputFile> {
            let bytes = std::fs::read(path)?;
            let content = String::from_utf8_lossy(&bytes).into_owned();
            let rel = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            Ok(InputFile { path: rel, content })
        })
        .collect()
}

struct LoadedProject {
    analysis: Analysis,
    config: ScnConfig,
    root: String,
}

/// Shared front half of both subcommands: config discovery, file
/// collection, and pipeline execution.
fn load_project(
    path: &Path,
    config_arg: Option<&Path>,
    show_progress: bool,
) -> anyhow::Result<LoadedProject> {
    let abs = path
        .canonicalize()
        .map_err(|e| anyhow::anyhow!("cannot access path {:?}: {e}", path))?;

    let (scan_root, files) = if abs.is_dir() {
        (abs.clone(), collect_files(&abs)?)
    } else {
        (
            abs.parent().unwrap_or(Path::new("/")).to_path_buf(),
            vec![abs.clone()],
        )
    };

    let config = match config_arg {
        Some(p) => ScnConfig::load(p)?,
        None => ScnConfig::discover(&scan_root)?
            .map(|(_, c)| c)
            .unwrap_or_default(),
    };

    let inputs = read_inputs(&scan_root, &files)?;
    let root = config
        .root
        .clone()
        .unwrap_or_else(|| scan_root.to_string_lossy().replace('\\', "/"));

    let bar = if show_progress {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(bar)
    } else {
        None
    };
    let on_progress = {
        let bar = bar.clone();
        move |p: Progress| {
            if let Some(bar) = &bar {
                bar.set_position(p.percentage.round() as u64);
                bar.set_message(p.message);
            }
        }
    };

    // The alias resolver borrows `config`; keep it in a scope that ends
    // before `config` moves into the returned project.
    let analysis = {
        let resolver = config.path_resolver();
        let options = ProjectOptions {
            root: root.clone(),
            include: config.include.clone(),
            exclude: config.exclude.clone(),
            path_resolver: Some(&resolver),
            on_progress: Some(&on_progress),
            cancel: None,
        };
        project::analyze_project(inputs, &options)?
    };

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    Ok(LoadedProject {
        analysis,
        config,
        root,
    })
}

fn formatting_options(config: &ScnConfig, preset: Option<Preset>) -> FormattingOptions {
    let mut opts = config.format.clone();
    if preset.is_some() {
        opts.preset = preset;
    }
    opts
}

/// Run the generate command.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<i32> {
    if args.format != "scn" && args.format != "json" {
        eprintln!("Error: invalid format {:?}, must be 'scn' or 'json'", args.format);
        return Ok(EXIT_ERROR);
    }

    let project = load_project(&args.path, args.config.as_deref(), !args.no_progress)?;

    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&project.analysis.files)?,
        _ => {
            let opts = formatting_options(&project.config, args.preset).resolve();
            format::format_scn(&project.analysis.files, &opts)
        }
    };

    match &args.output {
        Some(path) => std::fs::write(path, &output)?,
        None => println!("{output}"),
    }

    let symbol_count: usize = project.analysis.files.iter().map(|f| f.symbols.len()).sum();
    let tokens = CharEstimator.count(&output);
    eprintln!(
        "{} {} files, {} symbols, ~{} tokens in {:.0?} (root {})",
        "✓".green().bold(),
        project.analysis.files.len(),
        symbol_count,
        tokens,
        project.analysis.analysis_time,
        project.root.dimmed(),
    );

    Ok(EXIT_SUCCESS)
}

/// Run the impact command.
pub fn run_impact(args: &ImpactArgs) -> anyhow::Result<i32> {
    let project = load_project(&args.path, args.config.as_deref(), true)?;
    let base = formatting_options(&project.config, args.preset);
    let impact = options::token_impact(&project.analysis.files, &base, &CharEstimator);

    println!(
        "{} ({} base tokens)",
        "Token impact of flipping each option".bold(),
        impact.base_tokens
    );
    println!();
    println!("{}", "Options:".bold());
    for (key, delta) in &impact.options {
        println!("  {:<26} {}", key, render_delta(*delta));
    }
    println!();
    println!("{}", "Display filters:".bold());
    for (kind, delta) in &impact.display_filters {
        println!("  {:<26} {}", kind, render_delta(*delta));
    }

    Ok(EXIT_SUCCESS)
}

fn render_delta(delta: i64) -> String {
    if delta < 0 {
        format!("{delta}").green().to_string()
    } else if delta > 0 {
        format!("+{delta}").red().to_string()
    } else {
        "0".dimmed().to_string()
    }
}
