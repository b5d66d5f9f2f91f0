//! Archive publication: write to a temp file, rename into place on success.

use crate::Result;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process;

/// Removes a temp file on drop unless it was persisted.
struct TempFileGuard {
    path: PathBuf,
    should_cleanup: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            should_cleanup: true,
        }
    }

    /// Mark the temp file as successfully published.
    /// Prevents cleanup on drop.
    fn persist(mut self) {
        self.should_cleanup = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.should_cleanup {
            tracing::debug!(path = %self.path.display(), "removing unpublished temp archive");
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// The file an export run writes to, and how it reaches its final path.
///
/// In atomic mode the archive is written beside the output as
/// `.<name>.zipexport-tmp-<pid>` and renamed over the output by
/// [`PendingOutput::commit`]. Dropping an uncommitted `PendingOutput`
/// deletes the temp file, so the previous archive survives a failed run.
///
/// In direct mode the output itself is truncated and written.
///
/// # Examples
///
/// ```no_run
/// use zipexport_core::atomic::PendingOutput;
/// use std::io::Write;
/// use std::path::Path;
///
/// let pending = PendingOutput::new(Path::new("EXPORT.zip"), true);
/// let mut file = pending.create()?;
/// file.write_all(b"...")?;
/// drop(file);
/// pending.commit()?;
/// # Ok::<(), zipexport_core::ExportError>(())
/// ```
pub struct PendingOutput {
    final_path: PathBuf,
    guard: Option<TempFileGuard>,
}

impl PendingOutput {
    /// Prepares output for `final_path`.
    #[must_use]
    pub fn new(final_path: &Path, atomic: bool) -> Self {
        let guard = atomic.then(|| TempFileGuard::new(temp_path_for(final_path)));
        Self {
            final_path: final_path.to_path_buf(),
            guard,
        }
    }

    /// Path the archive bytes are written to.
    #[must_use]
    pub fn write_path(&self) -> &Path {
        self.guard
            .as_ref()
            .map_or(self.final_path.as_path(), |g| g.path.as_path())
    }

    /// Path the archive ends up at.
    #[must_use]
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Creates (truncating) the file at [`Self::write_path`].
    pub fn create(&self) -> Result<File> {
        Ok(File::create(self.write_path())?)
    }

    /// Publishes the written archive at its final path.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails; the temp file is then removed.
    pub fn commit(self) -> Result<()> {
        if let Some(guard) = self.guard {
            std::fs::rename(&guard.path, &self.final_path)?;
            guard.persist();
            tracing::debug!(path = %self.final_path.display(), "archive published");
        }
        Ok(())
    }
}

/// Temp file name used for atomic writes to `final_path`.
#[must_use]
pub fn temp_path_for(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map_or_else(|| "export".to_string(), |n| n.to_string_lossy().to_string());
    final_path.with_file_name(format!(".{name}.zipexport-tmp-{}", process::id()))
}
