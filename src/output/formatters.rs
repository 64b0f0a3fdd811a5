//! Report rendering for each output format

use crate::error::{PulseError, Result};
use crate::models::{RiskLevel, RiskScoreResult, ScanResult, Thresholds};
use ansi_term::Colour::{Blue, Green, Red, Yellow};
use ansi_term::Style;
use std::path::Path;

const RULE_WIDTH: usize = 60;
const PATH_COLUMN: usize = 40;

/// Path shown in reports: relative to the project root when possible
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn paint_level(level: RiskLevel, use_colors: bool) -> String {
    let label = format!("{:<5}", level.label());
    if !use_colors {
        return label;
    }
    match level {
        RiskLevel::Alert => Red.bold().paint(label).to_string(),
        RiskLevel::Warning => Yellow.paint(label).to_string(),
        RiskLevel::Low => Green.paint(label).to_string(),
    }
}

/// One report line for a scored file
pub fn format_file_line(
    root: &Path,
    file: &RiskScoreResult,
    thresholds: &Thresholds,
    use_colors: bool,
    verbose: bool,
) -> String {
    let level = file.risk_level(thresholds);
    let mut line = format!(
        "  {} {:<width$} {:>5.1}\n",
        paint_level(level, use_colors),
        display_path(root, &file.file_path),
        file.global_score,
        width = PATH_COLUMN
    );

    if verbose {
        let breakdown = format!(
            "        complexity {:.1} (max {}) | size {:.1} (max {} lines) | churn {:.1} ({} commits) | depth {:.1} (max {}) | params {:.1} (max {}) | fan-in {} | fan-out {}\n",
            file.complexity_score,
            file.max_complexity,
            file.function_size_score,
            file.max_function_size,
            file.churn_score,
            file.churn_touches,
            file.depth_score,
            file.max_depth,
            file.param_score,
            file.max_params,
            file.fan_in,
            file.fan_out,
        );
        if use_colors {
            line.push_str(&Style::new().dimmed().paint(breakdown).to_string());
        } else {
            line.push_str(&breakdown);
        }
    }

    line
}

/// Summary line closing every text report
pub fn format_summary_line(result: &ScanResult, thresholds: &Thresholds) -> String {
    let (alerts, warnings) = result.level_counts(thresholds);
    format!(
        "  {} files analysed | {} alert(s), {} warning(s) | {} import link(s) | {:.2}s\n",
        result.files.len(),
        alerts,
        warnings,
        result.edges.len(),
        result.duration.as_secs_f64()
    )
}

/// Full human-readable report
pub fn format_report_text(
    result: &ScanResult,
    thresholds: &Thresholds,
    use_colors: bool,
    verbose: bool,
) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut output = String::new();
    let root = &result.project_root;

    output.push_str(&rule);
    output.push('\n');
    let title = format!(" PULSE risk report  {}", root.display());
    if use_colors {
        output.push_str(&Blue.bold().paint(title).to_string());
    } else {
        output.push_str(&title);
    }
    output.push('\n');
    output.push_str(&rule);
    output.push('\n');

    for file in &result.files {
        output.push_str(&format_file_line(root, file, thresholds, use_colors, verbose));
    }

    if !result.cycles.is_empty() {
        output.push_str(&format!("\nImport cycles ({}):\n", result.cycles.len()));
        for cycle in &result.cycles {
            let members: Vec<String> = cycle.iter().map(|p| display_path(root, p)).collect();
            output.push_str(&format!("  {}\n", members.join(" -> ")));
        }
    }

    if !result.failures.is_empty() {
        let heading = format!("\nSkipped {} file(s)", result.failures.len());
        if use_colors {
            output.push_str(&Yellow.paint(heading).to_string());
        } else {
            output.push_str(&heading);
        }
        if verbose {
            output.push_str(":\n");
            for failure in &result.failures {
                output.push_str(&format!(
                    "  {}: {}\n",
                    display_path(root, &failure.path),
                    failure.reason
                ));
            }
        } else {
            output.push_str(" (use --verbose for details)\n");
        }
    }

    output.push_str(&rule);
    output.push('\n');
    output.push_str(&format_summary_line(result, thresholds));
    output
}

/// Format a scan result as JSON
pub fn format_results_json(result: &ScanResult, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    };
    rendered.map_err(|e| PulseError::JsonSerialize {
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })
}

/// Format a scan result as CSV, one row per scored file
pub fn format_results_csv(result: &ScanResult, thresholds: &Thresholds) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record([
        "file",
        "language",
        "level",
        "global_score",
        "complexity_score",
        "function_size_score",
        "churn_score",
        "depth_score",
        "param_score",
        "fan_in",
        "fan_out",
        "max_complexity",
        "max_function_size",
        "max_depth",
        "max_params",
        "churn_touches",
    ])?;

    for file in &result.files {
        writer.write_record([
            display_path(&result.project_root, &file.file_path),
            file.language.to_string(),
            file.risk_level(thresholds).label().to_string(),
            format!("{:.2}", file.global_score),
            format!("{:.2}", file.complexity_score),
            format!("{:.2}", file.function_size_score),
            format!("{:.2}", file.churn_score),
            format!("{:.2}", file.depth_score),
            format!("{:.2}", file.param_score),
            file.fan_in.to_string(),
            file.fan_out.to_string(),
            file.max_complexity.to_string(),
            file.max_function_size.to_string(),
            file.max_depth.to_string(),
            file.max_params.to_string(),
            file.churn_touches.to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| PulseError::Csv {
        source: csv::Error::from(e.into_error()),
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
