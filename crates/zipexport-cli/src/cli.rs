//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;
use zipexport_core::ExportConfig;

#[derive(Parser, Debug)]
#[command(name = "zipexport")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "With no options, exports the built-in project file list to EXPORT.zip \
                  in the current directory."
)]
pub struct Cli {
    /// Load settings from a JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// File or directory to include (can be repeated, replaces the list)
    #[arg(short, long = "include", value_name = "PATH")]
    pub include: Vec<PathBuf>,

    /// Substring that drops any path containing it (can be repeated,
    /// replaces the list)
    #[arg(short = 'x', long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Output archive path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Deflate compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub level: Option<u8>,

    /// Descend into symlinked directories
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Write the archive in place instead of through a temporary file
    #[arg(long)]
    pub no_atomic: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,
}

impl Cli {
    /// Builds the export configuration: defaults, then the configuration
    /// file, then command-line flags.
    pub fn export_config(&self) -> zipexport_core::Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::from_json_file(path)?,
            None => ExportConfig::default(),
        };

        if !self.include.is_empty() {
            config = config.with_include(self.include.clone());
        }
        if !self.exclude.is_empty() {
            config = config.with_exclude(self.exclude.clone());
        }
        if let Some(output) = &self.output {
            config = config.with_output(output);
        }
        if let Some(level) = self.level {
            config.compression_level = level;
        }
        if self.follow_symlinks {
            config = config.with_follow_symlinks(true);
        }
        if self.no_atomic {
            config = config.with_atomic(false);
        }

        config.validate()?;
        Ok(config)
    }
}
