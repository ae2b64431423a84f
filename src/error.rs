// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Schema-level problems: non-fatal per file, the run continues.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two distinct source column names canonicalize to the same string.
    /// The source file is ambiguous, so we refuse it rather than silently
    /// overwriting one column with the other.
    #[error(
        "column names `{first}` and `{second}` both normalize to `{normalized}`"
    )]
    NameCollision {
        first: String,
        second: String,
        normalized: String,
    },

    /// Strict consolidation: the file lacks required schema columns.
    #[error("{}: missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },
}

#[derive(Debug, Error)]
pub enum PrepError {
    /// Bad input or output path. Fatal, aborts before any processing.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Source file unreadable or structurally broken. Logged and skipped
    /// per file; one bad workbook must not abort a batch run.
    #[error("failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PrepError {
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PrepError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors the driver skips a single file over, false for
    /// errors that end the run.
    pub fn is_per_file(&self) -> bool {
        matches!(self, PrepError::Schema(_) | PrepError::Load { .. })
    }
}
