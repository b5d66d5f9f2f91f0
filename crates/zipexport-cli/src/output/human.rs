//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use zipexport_core::ExportReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    /// Archive size in kilobytes with one decimal, as shown in the summary.
    fn format_kb(bytes: u64) -> String {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_export_result(&self, output: &Path, report: &ExportReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let headline = format!(
            "{} created successfully ({})",
            output.display(),
            Self::format_kb(report.archive_size)
        );

        let _ = self.term.write_line("");
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {headline}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(&format!("✓ {headline}"));
        }
        let _ = self.term.write_line(&format!(
            "  Location: {}",
            report.output_path.display()
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Files added: {}", report.files_added));
            let _ = self
                .term
                .write_line(&format!("  Excluded:    {}", report.excluded));
            let _ = self
                .term
                .write_line(&format!("  Missing:     {}", report.missing.len()));
            if report.compression_ratio() > 0.0 {
                let _ = self.term.write_line(&format!(
                    "  Compression: {:.1}:1",
                    report.compression_ratio()
                ));
            }
            let _ = self
                .term
                .write_line(&format!("  Duration:    {:?}", report.duration));
        }

        if report.has_warnings() {
            let _ = self.term.write_line("");
            if self.use_colors {
                let _ = self
                    .term
                    .write_line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                let _ = self.term.write_line("Warnings:");
            }
            for warning in &report.warnings {
                let _ = self.term.write_line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("Error:").red().bold()));
        } else {
            let _ = term.write_line(&format!("Error: {error:?}"));
        }
    }
}
