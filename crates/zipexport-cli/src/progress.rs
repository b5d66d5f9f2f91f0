//! Console progress for export runs.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use std::time::Duration;
use zipexport_core::EntryOrigin;
use zipexport_core::ExportObserver;
use zipexport_core::ExportReport;

/// CLI observer implementing `ExportObserver`.
///
/// Prints one line per event (`Adding: ...`, `Warning: ...`). On a TTY the
/// lines are printed above a spinner that shows the byte count and
/// throughput; otherwise they go straight to stdout.
pub struct ConsoleObserver {
    verbose: bool,
    quiet: bool,
    spinner: Option<ProgressBar>,
    bytes_written: u64,
}

impl ConsoleObserver {
    /// Creates a new console observer.
    ///
    /// A quiet observer prints nothing.
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let spinner = (!quiet && Self::should_show()).then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} ({bytes}, {bytes_per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });

        Self {
            verbose,
            quiet,
            spinner,
            bytes_written: 0,
        }
    }

    /// Checks if we should show the spinner (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    fn line(&self, message: &str) {
        if self.quiet {
            return;
        }
        match &self.spinner {
            Some(bar) => bar.println(message),
            None => println!("{message}"),
        }
    }
}

impl Drop for ConsoleObserver {
    fn drop(&mut self) {
        if let Some(bar) = &self.spinner {
            bar.finish_and_clear();
        }
    }
}

impl ExportObserver for ConsoleObserver {
    fn on_start(&mut self, output: &Path) {
        self.line(&format!("Creating {}...", output.display()));
    }

    fn on_missing(&mut self, entry: &Path) {
        self.line(&format!("Warning: {} not found, skipping...", entry.display()));
    }

    fn on_entry_start(&mut self, path: &Path, origin: EntryOrigin) {
        let message = match origin {
            EntryOrigin::Listed => format!("Adding file: {}", path.display()),
            EntryOrigin::Discovered => format!("Adding: {}", path.display()),
        };
        self.line(&message);
        if let Some(bar) = &self.spinner {
            bar.set_message(path.display().to_string());
        }
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
        if let Some(bar) = &self.spinner {
            bar.set_position(self.bytes_written);
        }
    }

    fn on_excluded(&mut self, path: &Path, pattern: &str) {
        if self.verbose {
            self.line(&format!("Excluded: {} (matches '{pattern}')", path.display()));
        }
    }

    fn on_complete(&mut self, report: &ExportReport) {
        if let Some(bar) = &self.spinner {
            bar.finish_and_clear();
        }
        if self.verbose {
            self.line(&format!(
                "Read {} in {}",
                humanize_bytes(report.bytes_read),
                humanize_duration(report.duration)
            ));
        }
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{secs}s")
    } else {
        format!("{millis}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_bytes() {
        assert_eq!(humanize_bytes(0), "0 B");
        assert_eq!(humanize_bytes(512), "512 B");
        assert_eq!(humanize_bytes(1024), "1.0 KB");
        assert_eq!(humanize_bytes(1536), "1.5 KB");
        assert_eq!(humanize_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(humanize_bytes(1024 * 1024 * 1024), "1.0 GB");
        assert_eq!(humanize_bytes(1024_u64.pow(4)), "1.0 TB");
    }

    #[test]
    fn test_humanize_duration() {
        assert_eq!(humanize_duration(Duration::from_millis(0)), "0ms");
        assert_eq!(humanize_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(humanize_duration(Duration::from_secs(30)), "30s");
        assert_eq!(humanize_duration(Duration::from_secs(90)), "1m30s");
    }

    #[test]
    fn test_observer_counts_bytes() {
        let mut observer = ConsoleObserver::new(false, true);

        observer.on_entry_start(Path::new("data/a.txt"), EntryOrigin::Discovered);
        observer.on_bytes_written(1024);
        observer.on_bytes_written(512);
        observer.on_entry_complete(Path::new("data/a.txt"));

        assert_eq!(observer.bytes_written, 1536);
    }
}
