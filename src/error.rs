//! # Error types
//!
//! One `thiserror`-derived enum covering every failure kind the batch engine
//! can report. Each variant carries enough context to produce an actionable
//! message on its own; the dispatcher stores `to_string()` of these in
//! [`crate::model::BatchResult::errors`] rather than the error value itself,
//! since the result is a data object, not a `Result` chain.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("input not found: {0}")]
    FileNotFound(PathBuf),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("failed to resize: {0}")]
    Resize(String),

    #[error("failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid option '{field}': {reason}")]
    InvalidOption { field: String, reason: String },
}

impl BatchError {
    /// Short, stable tag for the error kind, independent of the message text.
    /// Used in log fields so a `RUST_LOG=debug` run can be grepped by kind.
    pub fn kind(&self) -> &'static str {
        match self {
            BatchError::FileNotFound(_) => "file_not_found",
            BatchError::UnsupportedFormat(_) => "unsupported_format",
            BatchError::Decode { .. } => "decode",
            BatchError::Resize(_) => "resize",
            BatchError::Encode { .. } => "encode",
            BatchError::Write { .. } => "write",
            BatchError::InvalidOption { .. } => "invalid_option",
        }
    }
}
