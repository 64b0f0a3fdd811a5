//! Configuration loading, argument parsing and report rendering

use super::support::*;
use clap::Parser;
use pulse::cli::Args;
use pulse::config::{load_config_with_env_prefix, CliArgs};
use pulse::models::OutputFormat;
use pulse::output::{create_formatter, CsvFormatter, Formatter, JsonFormatter};
use pulse::{PulseError, Thresholds};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_file_supplies_settings() {
    let dir = tempdir().unwrap();
    let config = write(
        dir.path(),
        "pulse.toml",
        "project_root = \"app\"\ndebounce_ms = 250\nignore = [\"vendor\"]\n\n[thresholds]\nalert = 70.0\nwarning = 40.0\n",
    );
    fs::create_dir_all(dir.path().join("app")).unwrap();

    let cli = CliArgs {
        config: Some(config),
        ..CliArgs::default()
    };
    let settings = load_config_with_env_prefix(cli, "PULSE_IT_FILE").unwrap();
    assert_eq!(settings.project_root, dir.path().join("app"));
    assert_eq!(settings.debounce_ms, 250);
    assert_eq!(settings.ignore, vec!["vendor".to_string()]);
    assert_eq!(settings.thresholds, Thresholds { alert: 70.0, warning: 40.0 });
}

#[test]
fn test_command_line_overrides_file() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "pulse.toml", "project_root = \".\"\noutput_format = \"csv\"\n");

    let cli = CliArgs {
        config: Some(config),
        path: Some(dir.path().to_path_buf()),
        output_format: Some(OutputFormat::Json),
        debounce_ms: Some(900),
        ..CliArgs::default()
    };
    let settings = load_config_with_env_prefix(cli, "PULSE_IT_OVERRIDE").unwrap();
    assert_eq!(settings.output_format, OutputFormat::Json);
    assert_eq!(settings.debounce_ms, 900);
}

#[test]
fn test_missing_explicit_config_is_not_found() {
    let dir = tempdir().unwrap();
    let cli = CliArgs {
        config: Some(dir.path().join("absent.toml")),
        ..CliArgs::default()
    };
    let err = load_config_with_env_prefix(cli, "PULSE_IT_MISSING").unwrap_err();
    match err {
        PulseError::ConfigNotFound { searched, .. } => {
            assert_eq!(searched, vec![dir.path().join("absent.toml")]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_config_is_parse_error() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "pulse.toml", "project_root = [\n");
    let cli = CliArgs {
        config: Some(config),
        ..CliArgs::default()
    };
    let err = load_config_with_env_prefix(cli, "PULSE_IT_MALFORMED").unwrap_err();
    assert!(matches!(err, PulseError::ConfigParse { .. }));
    assert!(err.is_critical());
}

#[test]
fn test_argument_parsing() {
    let args = Args::try_parse_from(["pulse", "src", "--format", "json", "-i", "vendor", "-i", "gen-*", "--watch"]).unwrap();
    assert_eq!(args.project_root(), Some("src".into()));
    assert_eq!(args.ignore, vec!["vendor".to_string(), "gen-*".to_string()]);
    assert!(args.watch);

    let cli = CliArgs::from(&args);
    assert_eq!(cli.output_format, Some(OutputFormat::Json));
    assert_eq!(cli.ignore.as_deref().map(|i| i.len()), Some(2));

    assert!(Args::try_parse_from(["pulse", "--quiet", "--verbose"]).is_err());
    assert!(Args::try_parse_from(["pulse", "--format", "xml"]).is_err());
}

#[test]
fn test_json_report_of_real_scan() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.ts", "import { b } from './b';\nexport const a = () => b();\n");
    write(dir.path(), "b.ts", "export function b() {\n  return 1;\n}\n");
    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();

    let json = JsonFormatter::new(true).format(&result).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["files"].as_array().unwrap().len(), 2);
    assert_eq!(value["edges"].as_array().unwrap().len(), 1);
    for file in value["files"].as_array().unwrap() {
        let score = file["global_score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));
    }
}

#[test]
fn test_csv_report_has_row_per_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "one.py", "def one():\n    return 1\n");
    write(dir.path(), "two.py", "def two(x):\n    if x:\n        return 2\n");
    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();

    let csv = CsvFormatter::new(Thresholds::default()).format(&result).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("file,language,level,global_score"));
}

#[test]
fn test_formatter_follows_settings() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.js", "function a() {}\n");
    let result = scanner_with(dir.path(), NoHistory).scan().unwrap();

    let mut settings = settings_for(dir.path());
    settings.use_colors = false;
    let text = create_formatter(&settings).format(&result).unwrap();
    assert!(text.contains("a.js"));
    assert!(text.contains("1 files analysed"));

    settings.output_format = OutputFormat::Json;
    let json = create_formatter(&settings).format(&result).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());
}
