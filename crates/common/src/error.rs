//! Error types shared across SwingTrace crates.

use std::path::PathBuf;

/// Top-level error type for SwingTrace operations.
#[derive(Debug, thiserror::Error)]
pub enum TracerError {
    /// Rejected user input: bad upload, bad style value, bad colour.
    #[error("{message}")]
    Validation { message: String },

    /// A point-store or history index outside the live range.
    #[error("Index {index} out of range (len {len})")]
    Index { index: usize, len: usize },

    #[error("Export failed: {message}")]
    Export { message: String },

    #[error("Export cancelled")]
    ExportCancelled,

    #[error("Tracking error: {message}")]
    Tracking { message: String },

    #[error("Project error: {message}")]
    Project { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TracerError.
pub type TracerResult<T> = Result<T, TracerError>;

impl TracerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    pub fn index(index: usize, len: usize) -> Self {
        Self::Index { index, len }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn tracking(msg: impl Into<String>) -> Self {
        Self::Tracking {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether the error is safe to show inline to the user as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Export { .. } | Self::ExportCancelled
        )
    }
}
