//! Configuration management
//!
//! Settings are merged from a TOML file, `PULSE_*` environment variables and
//! command-line flags, later sources overriding earlier ones.

pub mod cli;
pub mod file;
pub mod parser;
pub mod settings;

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PulseError, Result};
use crate::models::config::{PartialSettings, Settings};

pub use cli::{CliArgs, CliConfig};
pub use file::{EnvConfig, FileConfig};
pub use parser::{
    create_default_config, default_config_paths, parse_config_content, parse_config_file,
    DEFAULT_CONFIG_FILE,
};
pub use settings::SettingsValidator;

/// Prefix of the environment variables read by [`load_config`]
pub const ENV_PREFIX: &str = "PULSE";

/// Trait for configuration sources
pub trait ConfigSource {
    fn load(&self) -> Result<PartialSettings>;

    fn is_available(&self) -> bool;

    /// Name used in log output
    fn name(&self) -> &str;
}

/// Merges configuration sources in increasing precedence
pub struct ConfigBuilder {
    partial: PartialSettings,
    searched: Vec<PathBuf>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            partial: PartialSettings::default(),
            searched: Vec::new(),
        }
    }

    pub fn merge(mut self, partial: PartialSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Merge a source if available; its load errors are fatal
    pub fn load_from<S: ConfigSource>(self, source: &S) -> Result<Self> {
        if !source.is_available() {
            return Ok(self);
        }
        debug!(source = source.name(), "loading configuration");
        Ok(self.merge(source.load()?))
    }

    /// Load an explicitly requested file; a missing file is an error
    pub fn add_config_file(mut self, path: &Path) -> Result<Self> {
        self.searched.push(path.to_path_buf());
        let source = FileConfig::with_path(path);
        if !source.is_available() {
            return Err(PulseError::config_not_found(self.searched));
        }
        self.load_from(&source)
    }

    /// Load the first default-location file, if any
    pub fn add_default_config_file(self) -> Result<Self> {
        self.add_first_config_file(&default_config_paths())
    }

    pub fn add_first_config_file(mut self, candidates: &[PathBuf]) -> Result<Self> {
        self.searched.extend(candidates.iter().cloned());
        match parser::find_config_in(candidates)? {
            Some((_, partial)) => Ok(self.merge(partial)),
            None => Ok(self),
        }
    }

    /// Build and validate the final settings
    ///
    /// Fails with `ConfigNotFound` when no source supplied a project root.
    pub fn build(self) -> Result<Settings> {
        if self.partial.project_root.is_none() {
            return Err(PulseError::config_not_found(self.searched));
        }
        let settings = self.partial.to_settings();
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from every source with the standard precedence
pub fn load_config(cli_args: CliArgs) -> Result<Settings> {
    load_config_with_env_prefix(cli_args, ENV_PREFIX)
}

/// Load configuration reading environment variables under `env_prefix`
pub fn load_config_with_env_prefix(cli_args: CliArgs, env_prefix: &str) -> Result<Settings> {
    let builder = match &cli_args.config {
        Some(path) => ConfigBuilder::new().add_config_file(path)?,
        None => ConfigBuilder::new().add_default_config_file()?,
    };

    let settings = builder
        .load_from(&EnvConfig::new(env_prefix))?
        .load_from(&CliConfig::new(cli_args))?
        .build()?;

    debug!(root = %settings.project_root.display(), "configuration loaded");
    Ok(settings)
}
