//! Error types for export operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExportError`.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur while building an export archive.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed below an included directory.
    #[error("cannot walk {path}: {source}")]
    Walk {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A followed symlink points back at one of its ancestors.
    #[error("symlink loop detected at {path}")]
    SymlinkLoop {
        /// Path of the offending link.
        path: PathBuf,
    },

    /// The ZIP writer rejected an operation.
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Compression level is outside 1-9.
    #[error("invalid compression level {level}, expected 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// Output path cannot be used for the archive.
    #[error("invalid output path {path}: {reason}")]
    InvalidOutput {
        /// The rejected path.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration file could not be loaded.
    #[error("invalid configuration {path}: {reason}")]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// Parse or read failure.
        reason: String,
    },
}

impl ExportError {
    /// Returns `true` if the error came from reading the source tree rather
    /// than from writing the archive or from configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipexport_core::ExportError;
    /// use std::path::PathBuf;
    ///
    /// let err = ExportError::SymlinkLoop { path: PathBuf::from("src/loop") };
    /// assert!(err.is_source_error());
    ///
    /// let err = ExportError::InvalidCompressionLevel { level: 0 };
    /// assert!(!err.is_source_error());
    /// ```
    #[must_use]
    pub const fn is_source_error(&self) -> bool {
        matches!(self, Self::Walk { .. } | Self::SymlinkLoop { .. })
    }

    /// Returns `true` for configuration problems detected before any file is
    /// touched.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCompressionLevel { .. } | Self::InvalidOutput { .. } | Self::Config { .. }
        )
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::Zip(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for ExportError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        if let Some(ancestor) = err.loop_ancestor() {
            tracing::debug!(ancestor = %ancestor.display(), "walk hit symlink loop");
            return Self::SymlinkLoop { path };
        }
        match err.into_io_error() {
            Some(source) => Self::Walk { path, source },
            None => Self::Walk {
                path,
                source: std::io::Error::other("directory walk failed"),
            },
        }
    }
}
