//! File and environment configuration sources

use std::path::{Path, PathBuf};
use tracing::warn;

use super::{parser, ConfigSource};
use crate::error::{PulseError, Result};
use crate::models::config::PartialSettings;

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
}

impl FileConfig {
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
        }
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(PulseError::config_not_found(vec![self.path.clone()]));
        }
        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Environment variable configuration source
///
/// Reads `<PREFIX>_PROJECT_ROOT`, `<PREFIX>_IGNORE` (comma separated),
/// `<PREFIX>_DEBOUNCE_MS` and `<PREFIX>_OUTPUT_FORMAT`.
pub struct EnvConfig {
    prefix: String,
    name: String,
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Some(root) = self.var("PROJECT_ROOT") {
            settings.project_root = Some(PathBuf::from(root));
        }

        if let Some(ignore) = self.var("IGNORE") {
            settings.ignore = Some(
                ignore
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }

        if let Some(debounce) = self.var("DEBOUNCE_MS") {
            match debounce.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => settings.debounce_ms = Some(ms),
                _ => warn!(value = %debounce, "ignoring invalid {}_DEBOUNCE_MS", self.prefix),
            }
        }

        if let Some(format) = self.var("OUTPUT_FORMAT") {
            match format.parse() {
                Ok(output_format) => settings.output_format = Some(output_format),
                Err(reason) => warn!(%reason, "ignoring {}_OUTPUT_FORMAT", self.prefix),
            }
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ["PROJECT_ROOT", "IGNORE", "DEBOUNCE_MS", "OUTPUT_FORMAT"]
            .iter()
            .any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
