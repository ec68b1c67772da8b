//! Pipeline error types.

use std::path::PathBuf;

use crate::theme::ThemeError;

/// Errors that can occur during processing.
#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("required context key '{0}' is missing")]
    ContextMissingKey(String),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("processing was cancelled before anything was written")]
    Cancelled,

    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

impl ProcessError {
    /// Create a stage-specific error.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
