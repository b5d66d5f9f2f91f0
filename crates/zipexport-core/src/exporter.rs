//! The export run: resolve, filter, write, publish.

use crate::ExportConfig;
use crate::ExportError;
use crate::Result;
use crate::atomic::PendingOutput;
use crate::filters::ExclusionFilter;
use crate::report::EntryOrigin;
use crate::report::ExportObserver;
use crate::report::ExportReport;
use crate::report::NoopObserver;
use crate::walker::Candidate;
use crate::walker::FilteredEntry;
use crate::walker::FilteredWalker;
use crate::walker::classify;
use crate::writer::AddOutcome;
use crate::writer::ZipExportWriter;
use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Builds one export archive from an [`ExportConfig`].
///
/// Inclusion entries are processed in order. A missing entry is reported
/// and skipped; a file is added under its own path; a directory is walked
/// recursively and every surviving file is added under its full relative
/// path. Any I/O failure aborts the run.
///
/// # Examples
///
/// ```no_run
/// use zipexport_core::{ExportConfig, Exporter};
///
/// let config = ExportConfig::default().with_include(vec!["data".into()]);
/// let report = Exporter::new(config)?.run()?;
/// println!("{:.1} KB at {}", report.archive_size_kb(), report.output_path.display());
/// # Ok::<(), zipexport_core::ExportError>(())
/// ```
#[derive(Debug)]
pub struct Exporter {
    config: ExportConfig,
    filter: ExclusionFilter,
    base_dir: Option<PathBuf>,
}

impl Exporter {
    /// Creates an exporter after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ExportConfig) -> Result<Self> {
        config.validate()?;
        let filter = ExclusionFilter::new(config.exclude.clone());
        Ok(Self {
            config,
            filter,
            base_dir: None,
        })
    }

    /// Resolves inclusion entries and the output against `dir` instead of
    /// the process working directory. Entry names stay relative to `dir`.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Returns the configuration this exporter runs with.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Runs the export without progress reporting.
    pub fn run(&self) -> Result<ExportReport> {
        self.run_with_observer(&mut NoopObserver)
    }

    /// Runs the export, reporting each event to `observer`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output file cannot be created
    /// - An included file or directory cannot be read
    /// - Writing or publishing the archive fails
    pub fn run_with_observer(&self, observer: &mut dyn ExportObserver) -> Result<ExportReport> {
        let start = Instant::now();
        let mut report = ExportReport::default();

        let output = self.resolve(&self.config.output);
        if output.is_dir() {
            return Err(ExportError::InvalidOutput {
                path: output,
                reason: "path is a directory".to_string(),
            });
        }
        tracing::info!(
            output = %output.display(),
            entries = self.config.include.len(),
            atomic = self.config.atomic,
            "starting export"
        );
        observer.on_start(&self.config.output);

        let pending = PendingOutput::new(&output, self.config.atomic);
        let file = pending.create()?;
        let own_files = OwnFiles::new(&pending);
        let mut writer = ZipExportWriter::new(BufWriter::new(file), self.config.compression_level);

        let mut run = Run {
            writer: &mut writer,
            observer: &mut *observer,
            report: &mut report,
            own_files: &own_files,
        };

        for entry in &self.config.include {
            let path = self.resolve(entry);
            match classify(&path)? {
                Candidate::Missing => {
                    tracing::warn!(entry = %entry.display(), "inclusion entry not found");
                    run.observer.on_missing(entry);
                    run.report.missing.push(entry.clone());
                }
                Candidate::File => {
                    if let Some(pattern) = self.filter.matching_pattern(entry) {
                        run.excluded(entry, pattern);
                    } else {
                        run.add(&path, entry, EntryOrigin::Listed)?;
                    }
                }
                Candidate::Directory => {
                    let base = self.base_dir.as_deref().unwrap_or_else(|| Path::new(""));
                    let walker = FilteredWalker::new(&path, &self.filter, self.config.follow_symlinks)
                        .with_base(base);
                    for item in walker.walk() {
                        match item? {
                            FilteredEntry::File { path, archive_path } => {
                                run.add(&path, &archive_path, EntryOrigin::Discovered)?;
                            }
                            FilteredEntry::Excluded { path, pattern, .. } => {
                                run.excluded(&path, &pattern);
                            }
                        }
                    }
                }
                Candidate::Special => {
                    tracing::debug!(entry = %entry.display(), "not a regular file or directory, skipping");
                }
            }
        }

        let buffered = writer.finish()?;
        let file = buffered.into_inner().map_err(std::io::IntoInnerError::into_error)?;
        file.sync_all()?;
        drop(file);
        pending.commit()?;

        report.archive_size = fs::metadata(&output)?.len();
        report.output_path = fs::canonicalize(&output)?;
        report.duration = start.elapsed();

        tracing::info!(
            files = report.files_added,
            missing = report.missing.len(),
            excluded = report.excluded,
            bytes = report.archive_size,
            "export complete"
        );
        observer.on_complete(&report);

        Ok(report)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Mutable state of one run, threaded through the per-file steps.
struct Run<'r, W: std::io::Write + std::io::Seek> {
    writer: &'r mut ZipExportWriter<W>,
    observer: &'r mut dyn ExportObserver,
    report: &'r mut ExportReport,
    own_files: &'r OwnFiles,
}

impl<W: std::io::Write + std::io::Seek> Run<'_, W> {
    fn add(&mut self, path: &Path, archive_path: &Path, origin: EntryOrigin) -> Result<()> {
        if self.own_files.contains(path) {
            tracing::debug!(path = %path.display(), "skipping the archive being written");
            return Ok(());
        }

        if self.writer.contains(archive_path) {
            self.duplicate(archive_path);
            return Ok(());
        }

        self.observer.on_entry_start(archive_path, origin);
        let observer = &mut *self.observer;
        let outcome = self
            .writer
            .add_file(path, archive_path, &mut |n| observer.on_bytes_written(n))?;

        match outcome {
            AddOutcome::Written(bytes) => {
                tracing::debug!(path = %archive_path.display(), bytes, "added");
                self.report.files_added += 1;
                self.report.bytes_read += bytes;
                self.observer.on_entry_complete(archive_path);
            }
            AddOutcome::Duplicate => self.duplicate(archive_path),
        }
        Ok(())
    }

    fn duplicate(&mut self, archive_path: &Path) {
        tracing::warn!(path = %archive_path.display(), "entry already in archive");
        self.report
            .add_warning(format!("Skipped duplicate entry: {}", archive_path.display()));
    }

    fn excluded(&mut self, path: &Path, pattern: &str) {
        tracing::debug!(path = %path.display(), pattern, "excluded");
        self.report.excluded += 1;
        self.observer.on_excluded(path, pattern);
    }
}

/// Canonical identities of the output and its temp file, so a walk over a
/// directory that contains them never archives the archive.
struct OwnFiles {
    names: Vec<std::ffi::OsString>,
    canonical: Vec<PathBuf>,
}

impl OwnFiles {
    fn new(pending: &PendingOutput) -> Self {
        let paths = [pending.write_path(), pending.final_path()];
        let names = paths
            .iter()
            .filter_map(|p| p.file_name().map(ToOwned::to_owned))
            .collect();
        let canonical = paths.iter().filter_map(|p| canonical_identity(p)).collect();
        Self { names, canonical }
    }

    fn contains(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        if !self.names.iter().any(|n| n == name) {
            return false;
        }
        canonical_identity(path).is_some_and(|id| self.canonical.contains(&id))
    }
}

/// Canonical parent directory joined with the file name; works for files
/// that do not exist yet.
fn canonical_identity(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}
