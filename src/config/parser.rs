//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PulseError, Result};
use crate::models::config::PartialSettings;

/// Configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "pulse.toml";

/// Parse a TOML configuration file into PartialSettings
///
/// A relative `project_root` is resolved against the file's directory.
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| PulseError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    let mut settings = parse_config_content(&content, path)?;
    if let Some(root) = settings.project_root.take() {
        let resolved = match path.parent() {
            Some(dir) if root.is_relative() && !dir.as_os_str().is_empty() => dir.join(root),
            _ => root,
        };
        settings.project_root = Some(resolved);
    }
    Ok(settings)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| PulseError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Reject values that are malformed regardless of other sources
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(root) = &settings.project_root {
        if root.as_os_str().is_empty() {
            return Err(PulseError::config_error(format!(
                "Invalid empty project_root in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(entries) = &settings.ignore {
        for entry in entries {
            if entry.is_empty() {
                return Err(PulseError::config_error(format!(
                    "Empty ignore entry in config file: {}",
                    path.display()
                )));
            }
            glob::Pattern::new(entry).map_err(|e| {
                PulseError::config_error(format!(
                    "Invalid ignore pattern '{}' in config file: {}: {}",
                    entry,
                    path.display(),
                    e
                ))
            })?;
        }
    }

    if settings.debounce_ms == Some(0) {
        return Err(PulseError::config_error(format!(
            "Invalid debounce_ms 0 in config file: {}. Must be at least 1.",
            path.display()
        )));
    }

    if settings.churn_window_days == Some(0) {
        return Err(PulseError::config_error(format!(
            "Invalid churn_window_days 0 in config file: {}. Must be at least 1.",
            path.display()
        )));
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return Err(PulseError::config_error(format!(
                "Invalid empty output_file in config file: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Default lookup locations, in search order
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(".pulse.toml")];
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".pulse.toml"));
    }
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("pulse").join("config.toml"));
    }
    paths
}

/// First existing file among `candidates`, parsed
pub fn find_config_in(candidates: &[PathBuf]) -> Result<Option<(PathBuf, PartialSettings)>> {
    for candidate in candidates {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "using configuration file");
            let settings = parse_config_file(candidate)?;
            return Ok(Some((candidate.clone(), settings)));
        }
    }
    Ok(None)
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(PulseError::io_error)?;
        }
    }

    fs::write(path, default_config_template()).map_err(|e| PulseError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    Ok(())
}

/// The commented configuration written by `pulse --init`
pub fn default_config_template() -> &'static str {
    include_str!("default_config.toml")
}
