//! Configuration for export runs.

use crate::ExportError;
use crate::Result;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// Default archive file name, written to the working directory.
pub const DEFAULT_OUTPUT: &str = "EXPORT.zip";

/// Default deflate level (zlib's own default).
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

const DEFAULT_INCLUDE: &[&str] = &[
    "src",
    "addons",
    "dashboard",
    "test",
    "termux",
    "data",
    "CONFIG.example.json",
    "package.json",
    "ecosystem.config.js",
    "README.md",
    "AUDIT.md",
    ".gitignore",
];

const DEFAULT_EXCLUDE: &[&str] = &[
    "node_modules",
    ".log",
    "test-results",
    "CONFIG.json",
    "__pycache__",
    ".pyc",
];

/// Configuration for an export run.
///
/// The defaults describe the standard project export: the project's source,
/// add-on, dashboard, test and data trees plus the top-level manifests,
/// with dependency folders, logs, test output, live configuration and Python
/// caches left out.
///
/// # Examples
///
/// ```
/// use zipexport_core::ExportConfig;
///
/// let config = ExportConfig::default()
///     .with_include(vec!["data".into()])
///     .with_exclude(vec![".log".to_string()])
///     .with_output("out.zip");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Files and directories to archive, in write order.
    ///
    /// Paths are resolved against the working directory and their string
    /// form becomes the entry name.
    pub include: Vec<PathBuf>,

    /// Substrings that drop a candidate path when found anywhere in it.
    ///
    /// Matching is case-sensitive with no glob or anchoring: `.log` drops
    /// `access.log`, `my.logger` and `.logfile` alike.
    pub exclude: Vec<String>,

    /// Archive file to create or overwrite.
    ///
    /// Default: `EXPORT.zip`.
    pub output: PathBuf,

    /// Deflate level (1-9).
    ///
    /// Default: `6`.
    pub compression_level: u8,

    /// Descend into symlinked directories.
    ///
    /// Default: `false`. Symlinks to regular files are always archived with
    /// the target's contents. When enabled, a link back to an ancestor
    /// aborts the run with [`ExportError::SymlinkLoop`].
    pub follow_symlinks: bool,

    /// Write to a temporary file and rename it over `output` on success.
    ///
    /// Default: `true`. When disabled the output is truncated and written in
    /// place, so a failed run leaves a partial archive behind.
    pub atomic: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include: DEFAULT_INCLUDE.iter().map(PathBuf::from).collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(ToString::to_string).collect(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            follow_symlinks: false,
            atomic: true,
        }
    }
}

impl ExportConfig {
    /// Creates a new `ExportConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Every field is optional; missing fields keep their defaults.
    ///
    /// ```json
    /// { "include": ["src", "README.md"], "exclude": [".log"], "output": "out.zip" }
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ExportError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| ExportError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::debug!(
            path = %path.display(),
            include = config.include.len(),
            exclude = config.exclude.len(),
            "loaded export configuration"
        );
        Ok(config)
    }

    /// Sets the inclusion list.
    #[must_use]
    pub fn with_include(mut self, include: Vec<PathBuf>) -> Self {
        self.include = include;
        self
    }

    /// Sets the exclusion patterns.
    #[must_use]
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Sets the output archive path.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Sets the compression level.
    ///
    /// # Panics
    ///
    /// Panics if the level is not in the range 1-9.
    /// Use `validate()` for non-panicking validation.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!((1..=9).contains(&level), "compression level must be 1-9");
        self.compression_level = level;
        self
    }

    /// Sets whether symlinked directories are descended.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets whether the archive is published by temp-file rename.
    #[must_use]
    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level is not in range 1-9
    /// - Output path has no file name (empty, `..`, or a root)
    ///
    /// The filesystem is not consulted; an output that names an existing
    /// directory is rejected when the export runs.
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.compression_level) {
            return Err(ExportError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }
        if self.output.file_name().is_none() {
            return Err(ExportError::InvalidOutput {
                path: self.output.clone(),
                reason: "path has no file name".to_string(),
            });
        }
        Ok(())
    }
}
