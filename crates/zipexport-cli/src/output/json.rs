//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use zipexport_core::ExportReport;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct ExportOutput {
    output: String,
    output_path: String,
    files_added: usize,
    bytes_read: u64,
    archive_size: u64,
    archive_size_kb: f64,
    missing: Vec<String>,
    excluded: usize,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl ExportOutput {
    fn new(output: &Path, report: &ExportReport) -> Self {
        Self {
            output: output.display().to_string(),
            output_path: report.output_path.display().to_string(),
            files_added: report.files_added,
            bytes_read: report.bytes_read,
            archive_size: report.archive_size,
            archive_size_kb: (report.archive_size_kb() * 10.0).round() / 10.0,
            missing: report
                .missing
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            excluded: report.excluded,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_export_result(&self, output: &Path, report: &ExportReport) -> Result<()> {
        let output = JsonOutput::success("export", ExportOutput::new(output, report));
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("export", format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
