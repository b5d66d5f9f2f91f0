//! Path exclusion for export runs.
//!
//! Exclusion is a plain substring test against the path's string form. A
//! pattern is never treated as a glob and never anchored to a component, so
//! `.log` drops `logs/app.log`, `src/my.logger.js` and `.logfile` equally.

use std::path::Path;

/// Substring exclusion filter built from `ExportConfig::exclude`.
///
/// # Examples
///
/// ```
/// use zipexport_core::ExclusionFilter;
/// use std::path::Path;
///
/// let filter = ExclusionFilter::new(vec![".log".to_string(), "node_modules".to_string()]);
///
/// assert!(filter.is_excluded(Path::new("data/tmp.log")));
/// assert!(filter.is_excluded(Path::new("src/node_modules/pkg/index.js")));
/// assert!(!filter.is_excluded(Path::new("data/a.txt")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    patterns: Vec<String>,
}

impl ExclusionFilter {
    /// Creates a filter from a list of patterns.
    ///
    /// Patterns are kept as given. An empty pattern is a substring of every
    /// path and therefore excludes everything.
    #[must_use]
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Returns the first pattern contained in `path`, if any.
    #[must_use]
    pub fn matching_pattern(&self, path: &Path) -> Option<&str> {
        let path_str = path.to_string_lossy();
        self.patterns
            .iter()
            .find(|pattern| path_str.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// Returns `true` if any pattern occurs anywhere in `path`.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.matching_pattern(path).is_some()
    }

    /// Returns the active patterns.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
