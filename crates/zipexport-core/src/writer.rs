//! ZIP entry writing for export archives.

use crate::ExportError;
use crate::Result;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Copy buffer size for streaming file contents into the archive.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Outcome of [`ZipExportWriter::add_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The file was written; carries the number of bytes read.
    Written(u64),
    /// An entry with the same name was already written in this run.
    Duplicate,
}

/// Deflate ZIP writer keyed by normalized relative path.
///
/// # Examples
///
/// ```
/// use zipexport_core::writer::ZipExportWriter;
/// use std::io::Cursor;
///
/// let writer = ZipExportWriter::new(Cursor::new(Vec::new()), 6);
/// let cursor = writer.finish()?;
/// assert!(!cursor.into_inner().is_empty());
/// # Ok::<(), zipexport_core::ExportError>(())
/// ```
pub struct ZipExportWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    written: HashSet<String>,
    buffer: Vec<u8>,
}

impl<W: Write + Seek> ZipExportWriter<W> {
    /// Creates a writer using deflate at `compression_level` (1-9).
    pub fn new(writer: W, compression_level: u8) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(compression_level)));

        Self {
            zip: ZipWriter::new(writer),
            options,
            written: HashSet::new(),
            buffer: vec![0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Adds the contents of `file_path` under the entry name derived from
    /// `archive_path`.
    ///
    /// `on_bytes` is invoked for every chunk copied.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or read
    /// - The path has no usable entry name
    /// - The ZIP writer fails
    pub fn add_file(
        &mut self,
        file_path: &Path,
        archive_path: &Path,
        on_bytes: &mut dyn FnMut(u64),
    ) -> Result<AddOutcome> {
        let name = entry_name(archive_path)?;
        if self.written.contains(&name) {
            return Ok(AddOutcome::Duplicate);
        }

        let mut file = File::open(file_path)?;
        let options = self.file_options(&file)?;

        self.zip.start_file(name.as_str(), options)?;

        let mut bytes_read = 0u64;
        loop {
            let n = file.read(&mut self.buffer)?;
            if n == 0 {
                break;
            }
            self.zip.write_all(&self.buffer[..n])?;
            bytes_read += n as u64;
            on_bytes(n as u64);
        }

        self.written.insert(name);
        Ok(AddOutcome::Written(bytes_read))
    }

    /// Returns `true` if an entry named after `archive_path` was written.
    #[must_use]
    pub fn contains(&self, archive_path: &Path) -> bool {
        entry_name(archive_path).is_ok_and(|name| self.written.contains(&name))
    }

    /// Number of entries written so far.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.written.len()
    }

    /// Writes the central directory and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the central directory cannot be written.
    pub fn finish(self) -> Result<W> {
        let mut inner = self.zip.finish()?;
        inner.flush()?;
        Ok(inner)
    }

    #[cfg(unix)]
    fn file_options(&self, file: &File) -> Result<SimpleFileOptions> {
        use std::os::unix::fs::PermissionsExt;
        let mode = file.metadata()?.permissions().mode();
        Ok(self.options.unix_permissions(mode))
    }

    #[cfg(not(unix))]
    fn file_options(&self, _file: &File) -> Result<SimpleFileOptions> {
        Ok(self.options)
    }
}

/// Computes the ZIP entry name for a discovered path.
///
/// Root and drive prefixes and `.` components are dropped, `..` collapses
/// the preceding component (a leading `..` is dropped), and components are
/// joined with `/` on every platform.
///
/// # Examples
///
/// ```
/// use zipexport_core::writer::entry_name;
/// use std::path::Path;
///
/// assert_eq!(entry_name(Path::new("data/a.txt")).unwrap(), "data/a.txt");
/// assert_eq!(entry_name(Path::new("./src/../README.md")).unwrap(), "README.md");
/// assert_eq!(entry_name(Path::new("/abs/file.txt")).unwrap(), "abs/file.txt");
/// ```
pub fn entry_name(path: &Path) -> Result<String> {
    let mut parts: Vec<&str> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    ExportError::Io(std::io::Error::other(format!(
                        "path is not valid UTF-8: {}",
                        path.display()
                    )))
                })?;
                parts.push(part);
            }
            Component::ParentDir => {
                parts.pop();
            }
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
        }
    }

    if parts.is_empty() {
        return Err(ExportError::Io(std::io::Error::other(format!(
            "no entry name for {}",
            path.display()
        ))));
    }

    Ok(parts.join("/"))
}
