//! Error types for the SCN pipeline.

use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// Per-file problems (parse failures, unresolved references, malformed
/// queries) are *not* errors: they are recorded on the affected
/// [`SourceFile`](crate::model::SourceFile) and the pipeline continues.
#[derive(Debug, Error)]
pub enum ScnError {
    /// The caller requested cancellation via a [`CancelToken`](crate::project::CancelToken).
    ///
    /// Distinct from both success and failure: the file set processed so
    /// far is discarded and no partial output is produced.
    #[error("analysis cancelled")]
    Cancelled,

    /// An include/exclude glob pattern failed to compile.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A configuration file exists but does not deserialize.
    #[error("invalid config file '{path}': {source}")]
    Config {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScnError>;

impl ScnError {
    /// True when the error is the cooperative-cancellation outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScnError::Cancelled)
    }
}
