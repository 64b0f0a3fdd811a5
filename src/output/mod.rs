//! Output formatting and writing functionality

mod formatters;
mod progress;
mod writers;

pub use self::formatters::{
    display_path, format_file_line, format_report_text, format_results_csv, format_results_json,
    format_summary_line,
};
pub use self::progress::{create_progress_callback, ProgressReporter};
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::config::{OutputFormat, Settings};
use crate::models::{ScanResult, Thresholds};

/// Renders a scan result into a report
pub trait Formatter: Send + Sync {
    fn format(&self, result: &ScanResult) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub thresholds: Thresholds,
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    pub fn new(thresholds: Thresholds, use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            thresholds,
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, result: &ScanResult) -> Result<String> {
        // Quiet mode keeps only the summary line
        if self.quiet {
            return Ok(format_summary_line(result, &self.thresholds).trim_start().to_string());
        }
        Ok(format_report_text(result, &self.thresholds, self.use_colors, self.verbose))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, result: &ScanResult) -> Result<String> {
        let mut rendered = format_results_json(result, self.pretty)?;
        rendered.push('\n');
        Ok(rendered)
    }
}

/// CSV formatter for spreadsheet analysis
pub struct CsvFormatter {
    pub thresholds: Thresholds,
}

impl CsvFormatter {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, result: &ScanResult) -> Result<String> {
        format_results_csv(result, &self.thresholds)
    }
}

/// Create the formatter selected by the settings
pub fn create_formatter(settings: &Settings) -> Box<dyn Formatter> {
    match settings.output_format {
        OutputFormat::Text => Box::new(TextFormatter::new(
            settings.thresholds,
            settings.use_colors && settings.output_file.is_none(),
            settings.verbose,
            settings.quiet,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter::new(settings.thresholds)),
    }
}
