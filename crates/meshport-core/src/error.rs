//! Unified error type for model conversion.
//!
//! All failures fall into the three-way taxonomy import / export /
//! traversal; nothing is caught or retried internally, everything
//! propagates to the caller through `?`.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all conversion operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source file could not be loaded as a scene.
    #[error("failed to import scene from {path}: {reason}")]
    Import {
        /// The source path that could not be loaded.
        path: PathBuf,
        /// Backend description of the failure.
        reason: String,
    },

    /// The scene could not be written to the destination.
    ///
    /// Covers unwritable paths, unsupported target extensions, and
    /// conversion-tool failures (non-zero exit, missing or empty output).
    #[error("failed to export scene to {path}: {reason}")]
    Export {
        /// The destination path that could not be written.
        path: PathBuf,
        /// Backend description of the failure.
        reason: String,
    },

    /// The configured backend cannot reorient the scene root.
    #[error("conversion tool '{command}' does not support root rotation")]
    RotationUnsupported {
        /// The tool command that lacks rotation placeholders.
        command: String,
    },

    /// Filesystem access failed during the directory walk.
    #[error("failed to traverse {path}")]
    Traversal {
        /// The directory or entry that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A path could not be passed to the external tool as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    InvalidUtf8Path {
        /// The path that is not valid UTF-8.
        path: PathBuf,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Build an [`ConvertError::Import`] from a path and any displayable cause.
    pub fn import(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Import {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`ConvertError::Export`] from a path and any displayable cause.
    pub fn export(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Export {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
