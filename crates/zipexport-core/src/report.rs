//! Export run reporting and progress events.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// How a file reached the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    /// Listed directly in the inclusion list.
    Listed,
    /// Found while walking an included directory.
    Discovered,
}

/// Report of an export run.
///
/// # Examples
///
/// ```
/// use zipexport_core::ExportReport;
///
/// let mut report = ExportReport::default();
/// report.archive_size = 12_697;
/// assert_eq!(format!("{:.1}", report.archive_size_kb()), "12.4");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Number of files written to the archive.
    pub files_added: usize,

    /// Total bytes read from source files (uncompressed).
    pub bytes_read: u64,

    /// Size of the finished archive in bytes.
    pub archive_size: u64,

    /// Inclusion entries that did not exist, in inclusion-list order.
    pub missing: Vec<PathBuf>,

    /// Number of paths dropped by the exclusion filter (a pruned directory
    /// counts once).
    pub excluded: usize,

    /// Absolute path of the finished archive.
    pub output_path: PathBuf,

    /// Duration of the run.
    pub duration: Duration,

    /// Warnings generated during the run.
    pub warnings: Vec<String>,
}

impl ExportReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Archive size in kilobytes (1 KB = 1024 bytes).
    #[must_use]
    pub fn archive_size_kb(&self) -> f64 {
        self.archive_size as f64 / 1024.0
    }

    /// Returns the compression ratio (uncompressed / archive size).
    ///
    /// Returns 0.0 if either size is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_size == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.archive_size as f64
    }
}

/// Callback trait for observing an export run.
///
/// Every method has an empty default, so implementors override only the
/// events they display.
///
/// # Examples
///
/// ```
/// use zipexport_core::{EntryOrigin, ExportObserver};
/// use std::path::Path;
///
/// struct Lines;
///
/// impl ExportObserver for Lines {
///     fn on_entry_start(&mut self, path: &Path, _origin: EntryOrigin) {
///         println!("Adding: {}", path.display());
///     }
///
///     fn on_missing(&mut self, entry: &Path) {
///         println!("Warning: {} not found, skipping...", entry.display());
///     }
/// }
/// ```
pub trait ExportObserver {
    /// Called once before the first inclusion entry is resolved.
    fn on_start(&mut self, _output: &Path) {}

    /// Called for each inclusion entry that does not exist.
    fn on_missing(&mut self, _entry: &Path) {}

    /// Called before a file is written to the archive.
    fn on_entry_start(&mut self, _path: &Path, _origin: EntryOrigin) {}

    /// Called for each chunk of file content written.
    fn on_bytes_written(&mut self, _bytes: u64) {}

    /// Called after a file has been written to the archive.
    fn on_entry_complete(&mut self, _path: &Path) {}

    /// Called for each path dropped by the exclusion filter.
    fn on_excluded(&mut self, _path: &Path, _pattern: &str) {}

    /// Called once after the archive has been published.
    fn on_complete(&mut self, _report: &ExportReport) {}
}

/// No-op implementation of `ExportObserver`.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ExportObserver for NoopObserver {}
