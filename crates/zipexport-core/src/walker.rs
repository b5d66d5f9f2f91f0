//! Inclusion-entry resolution and directory walking with exclusion.
//!
//! Every file below an included directory is visited, at any depth. A
//! directory whose own path contains an exclusion pattern is pruned: each of
//! its descendants carries the same path prefix and would be excluded anyway.

use crate::ExportError;
use crate::Result;
use crate::filters::ExclusionFilter;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// What an inclusion entry resolved to on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// Nothing exists at the path (or it cannot be stat'ed).
    Missing,
    /// A regular file, possibly through a symlink.
    File,
    /// A directory, possibly through a symlink.
    Directory,
    /// Something else (FIFO, socket, device); never archived.
    Special,
}

/// Resolves an inclusion entry against the filesystem, following symlinks.
///
/// A path that does not exist, runs through a non-directory, or is a
/// dangling or looping symlink is `Missing`.
///
/// # Errors
///
/// Any other stat failure (permission denied, name too long, I/O error) is
/// returned as [`ExportError::Walk`].
///
/// # Examples
///
/// ```
/// use zipexport_core::walker::{classify, Candidate};
/// use std::path::Path;
///
/// assert_eq!(classify(Path::new("/definitely/not/here"))?, Candidate::Missing);
/// assert_eq!(classify(Path::new(env!("CARGO_MANIFEST_DIR")))?, Candidate::Directory);
/// # Ok::<(), zipexport_core::ExportError>(())
/// ```
pub fn classify(path: &Path) -> Result<Candidate> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(Candidate::Directory),
        Ok(meta) if meta.is_file() => Ok(Candidate::File),
        Ok(_) => Ok(Candidate::Special),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(Candidate::Missing)
        }
        // The link itself exists but its target cannot be resolved
        Err(_) if fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink()) => {
            Ok(Candidate::Missing)
        }
        Err(source) => Err(walk_error(path, source)),
    }
}

/// One item produced while walking an included directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilteredEntry {
    /// A file that passed the exclusion filter.
    File {
        /// Filesystem path to read from.
        path: PathBuf,
        /// Path relative to the export base, used for the entry name.
        archive_path: PathBuf,
    },

    /// A path dropped by the exclusion filter.
    Excluded {
        /// Path relative to the export base.
        path: PathBuf,
        /// Pattern that matched.
        pattern: String,
        /// `true` if a whole directory was pruned.
        is_dir: bool,
    },
}

/// Walks one included directory, applying an [`ExclusionFilter`].
///
/// Entries are visited in file-name order within each directory so that
/// repeated exports of the same tree produce the same archive layout.
///
/// # Examples
///
/// ```no_run
/// use zipexport_core::ExclusionFilter;
/// use zipexport_core::walker::{FilteredEntry, FilteredWalker};
/// use std::path::Path;
///
/// let filter = ExclusionFilter::new(vec![".log".to_string()]);
/// let walker = FilteredWalker::new(Path::new("data"), &filter, false);
///
/// for entry in walker.walk() {
///     if let FilteredEntry::File { archive_path, .. } = entry? {
///         println!("would add {}", archive_path.display());
///     }
/// }
/// # Ok::<(), zipexport_core::ExportError>(())
/// ```
pub struct FilteredWalker<'a> {
    root: &'a Path,
    base: Option<&'a Path>,
    filter: &'a ExclusionFilter,
    follow_symlinks: bool,
}

impl<'a> FilteredWalker<'a> {
    /// Creates a walker rooted at an included directory.
    #[must_use]
    pub fn new(root: &'a Path, filter: &'a ExclusionFilter, follow_symlinks: bool) -> Self {
        Self {
            root,
            base: None,
            filter,
            follow_symlinks,
        }
    }

    /// Sets the directory that inclusion entries are relative to.
    ///
    /// The base is stripped before exclusion matching and from
    /// `archive_path`, so patterns never match the base directory's own name.
    #[must_use]
    pub fn with_base(mut self, base: &'a Path) -> Self {
        self.base = Some(base);
        self
    }

    /// Returns an iterator over the files and exclusions below the root.
    ///
    /// # Errors
    ///
    /// Items are errors if:
    /// - A directory cannot be read
    /// - A symlink is dangling
    /// - `follow_symlinks` is set and a link points back at an ancestor
    pub fn walk(&self) -> FilteredWalk<'a> {
        let inner = WalkDir::new(self.root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter();

        FilteredWalk {
            inner,
            base: self.base,
            filter: self.filter,
        }
    }
}

/// Iterator returned by [`FilteredWalker::walk`].
pub struct FilteredWalk<'a> {
    inner: walkdir::IntoIter,
    base: Option<&'a Path>,
    filter: &'a ExclusionFilter,
}

impl Iterator for FilteredWalk<'_> {
    type Item = Result<FilteredEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(ExportError::from(e))),
            };
            let is_dir = entry.file_type().is_dir();
            let archive_path = relative_to(entry.path(), self.base);

            if let Some(pattern) = self.filter.matching_pattern(&archive_path).map(str::to_string) {
                if is_dir {
                    self.inner.skip_current_dir();
                }
                return Some(Ok(FilteredEntry::Excluded {
                    path: archive_path,
                    pattern,
                    is_dir,
                }));
            }

            if is_dir {
                continue;
            }

            match is_archivable(&entry) {
                Ok(true) => {
                    return Some(Ok(FilteredEntry::File {
                        path: entry.into_path(),
                        archive_path,
                    }));
                }
                Ok(false) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Decides whether a non-directory walk entry holds file content.
///
/// Symlinks are resolved: a link to a regular file is archivable, a link to
/// a directory is not descended when links are not followed.
fn is_archivable(entry: &walkdir::DirEntry) -> Result<bool> {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return Ok(true);
    }

    if file_type.is_symlink() {
        let meta = fs::metadata(entry.path()).map_err(|source| walk_error(entry.path(), source))?;
        if meta.is_dir() {
            tracing::debug!(path = %entry.path().display(), "not descending into symlinked directory");
        }
        return Ok(meta.is_file());
    }

    tracing::debug!(path = %entry.path().display(), "skipping special file");
    Ok(false)
}

/// Strips `base` from `path` when possible.
#[must_use]
pub fn relative_to(path: &Path, base: Option<&Path>) -> PathBuf {
    base.and_then(|b| path.strip_prefix(b).ok())
        .unwrap_or(path)
        .to_path_buf()
}

fn walk_error(path: &Path, source: io::Error) -> ExportError {
    ExportError::Walk {
        path: path.to_path_buf(),
        source,
    }
}
