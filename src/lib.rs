//! scn: Symbolic Context Notation.
//!
//! Turns a codebase into a compact, dependency-ordered map of its files,
//! symbols, and relationships. Each supported language ships a
//! tree-sitter query whose capture names drive a shared interpreter, so
//! adding a language means writing a query, not an analyzer.
//!
//! # Architecture
//!
//! The pipeline has five stages:
//!
//! 1. **Parse** each file with its language grammar (`parse`)
//! 2. **Analyze** the capture stream into symbols, modifiers, and
//!    relationships (`analyze`)
//! 3. **Resolve** imports and references across files (`resolve`)
//! 4. **Order** files so dependencies print before dependents (`order`)
//! 5. **Format** the result as SCN text (`format`)
//!
//! [`project::analyze_project`] drives stages 1-3 with progress and
//! cancellation hooks; [`format::format_scn`] covers 4-5.
//!
//! # Adding a New Language
//!
//! See `src/lang/` for examples. Write a query whose capture names follow
//! the `category.kind.role` convention and register a `LanguageConfig`
//! in `lang/mod.rs`.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod lang;
pub mod model;
pub mod options;
pub mod order;
pub mod parse;
pub mod paths;
pub mod project;
pub mod resolve;
pub mod span;

pub use config::ScnConfig;
pub use error::{Result, ScnError};
pub use format::format_scn;
pub use model::{CodeSymbol, Relationship, RelationshipKind, SourceFile, SymbolKind};
pub use options::{FormattingOptions, Preset, ResolvedOptions};
pub use project::{analyze_project, Analysis, CancelToken, InputFile, ProjectOptions};
