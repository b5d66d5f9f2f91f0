//! Filtered project export into a single ZIP archive.
//!
//! `zipexport-core` walks an ordered list of files and directories, drops
//! every path that contains one of a set of substring patterns, and writes
//! the surviving files into a deflate-compressed ZIP archive keyed by their
//! relative paths.
//!
//! # Examples
//!
//! ```no_run
//! use zipexport_core::ExportConfig;
//! use zipexport_core::export;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExportConfig::default()
//!     .with_include(vec!["src".into(), "README.md".into()])
//!     .with_exclude(vec!["node_modules".to_string(), ".log".to_string()]);
//! let report = export(&config)?;
//! println!("Added {} files", report.files_added);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod config;
pub mod error;
pub mod exporter;
pub mod filters;
pub mod report;
pub mod walker;
pub mod writer;

pub use config::ExportConfig;
pub use error::ExportError;
pub use error::Result;
pub use exporter::Exporter;
pub use filters::ExclusionFilter;
pub use report::EntryOrigin;
pub use report::ExportObserver;
pub use report::ExportReport;
pub use report::NoopObserver;

/// Runs an export relative to the current working directory.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or any filesystem
/// operation fails.
pub fn export(config: &ExportConfig) -> Result<ExportReport> {
    Exporter::new(config.clone())?.run()
}

/// Runs an export relative to the current working directory, reporting
/// progress to `observer`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or any filesystem
/// operation fails.
pub fn export_with_observer(
    config: &ExportConfig,
    observer: &mut dyn ExportObserver,
) -> Result<ExportReport> {
    Exporter::new(config.clone())?.run_with_observer(observer)
}
