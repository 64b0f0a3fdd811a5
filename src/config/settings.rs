//! Validation of merged settings

use std::path::Path;

use crate::error::{PulseError, Result, ResultExt};
use crate::models::config::{Settings, MAX_CHURN_WINDOW_DAYS};

/// Checks run once every source has been merged
pub struct SettingsValidator;

impl SettingsValidator {
    pub fn validate(settings: &Settings) -> Result<()> {
        for entry in &settings.ignore {
            glob::Pattern::new(entry).with_context(|| format!("Invalid ignore pattern: {}", entry))?;
        }

        let thresholds = settings.thresholds;
        let in_range = |value: f64| (0.0..=100.0).contains(&value);
        if !in_range(thresholds.alert) || !in_range(thresholds.warning) {
            return Err(PulseError::config_error(
                "Thresholds must lie between 0 and 100",
            ));
        }
        if thresholds.warning > thresholds.alert {
            return Err(PulseError::config_error(format!(
                "Warning threshold {} exceeds alert threshold {}",
                thresholds.warning, thresholds.alert
            )));
        }

        if settings.debounce_ms == 0 {
            return Err(PulseError::config_error("debounce_ms must be at least 1"));
        }
        if settings.churn_window_days == 0 {
            return Err(PulseError::config_error("churn_window_days must be at least 1"));
        }
        if settings.churn_window_days > MAX_CHURN_WINDOW_DAYS {
            return Err(PulseError::config_error(format!(
                "churn_window_days must be at most {}",
                MAX_CHURN_WINDOW_DAYS
            )));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    fn validate_output_path(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(PulseError::invalid_path(parent))
            }
            _ => Ok(()),
        }
    }
}
