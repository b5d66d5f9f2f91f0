//! Error conversion utilities for CLI.
//!
//! Converts zipexport-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use zipexport_core::ExportError;

/// Converts `ExportError` to user-friendly anyhow error with context
pub fn convert_export_error(err: ExportError, output: &Path) -> anyhow::Error {
    match err {
        ExportError::Walk { path, source } => {
            anyhow!(
                "Cannot read '{}' while building '{}': {}\n\
                 HINT: Check permissions, or drop the path with --exclude.",
                path.display(),
                output.display(),
                source
            )
        }
        ExportError::SymlinkLoop { path } => {
            anyhow!(
                "Symlink loop detected at '{}'\n\
                 HINT: Remove the link or run without --follow-symlinks.",
                path.display()
            )
        }
        ExportError::InvalidCompressionLevel { level } => {
            anyhow!(
                "Invalid compression level {level}\n\
                 HINT: Use a level between 1 (fastest) and 9 (smallest)."
            )
        }
        ExportError::InvalidOutput { path, reason } => {
            anyhow!(
                "Cannot write archive to '{}': {}\n\
                 HINT: Pass a file path to --output, e.g. --output EXPORT.zip.",
                path.display(),
                reason
            )
        }
        ExportError::Config { path, reason } => {
            anyhow!(
                "Invalid configuration file '{}': {}\n\
                 HINT: Allowed keys are include, exclude, output, compression_level, \
                 follow_symlinks and atomic.",
                path.display(),
                reason
            )
        }
        ExportError::Io(io_err) => {
            anyhow!(
                "I/O error while writing '{}': {}",
                output.display(),
                io_err
            )
        }
        ExportError::Zip(reason) => {
            anyhow!(
                "Failed to build archive '{}': {}",
                output.display(),
                reason
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_walk_error() {
        let err = ExportError::Walk {
            path: PathBuf::from("src/private"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        let converted = convert_export_error(err, Path::new("EXPORT.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("src/private"));
        assert!(msg.contains("EXPORT.zip"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_symlink_loop_error() {
        let err = ExportError::SymlinkLoop {
            path: PathBuf::from("src/loop"),
        };
        let converted = convert_export_error(err, Path::new("EXPORT.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("Symlink loop"));
        assert!(msg.contains("--follow-symlinks"));
    }

    #[test]
    fn test_convert_config_error() {
        let err = ExportError::Config {
            path: PathBuf::from("export.json"),
            reason: "unknown field `exclusions`".to_string(),
        };
        let converted = convert_export_error(err, Path::new("EXPORT.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("export.json"));
        assert!(msg.contains("exclusions"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_io_error() {
        let io_err = io::Error::new(io::ErrorKind::StorageFull, "no space left");
        let converted = convert_export_error(ExportError::Io(io_err), Path::new("EXPORT.zip"));
        let msg = format!("{converted:?}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("no space left"));
    }
}
