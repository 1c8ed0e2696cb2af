// src/config/loader.rs
//! Layered configuration loading: defaults, TOML files, then environment

use crate::config::{constants::paths, MonitorConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("configuration parse error: {0}")]
    Parse(String),

    #[error("configuration validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<::config::ConfigError> for ConfigError {
    fn from(err: ::config::ConfigError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Configuration loader
///
/// Later sources override earlier ones: built-in defaults, each optional TOML
/// file in order, then `PREFIX__SECTION__KEY` environment variables.
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    required_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader looking for `vitals.toml` in the working directory
    pub fn new() -> Self {
        Self {
            config_paths: vec![PathBuf::from(paths::DEFAULT_CONFIG_FILE)],
            required_paths: Vec::new(),
            env_prefix: Some(paths::ENV_PREFIX.to_string()),
        }
    }

    /// Loader with custom optional paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            ..Self::new()
        }
    }

    /// Add a file that must exist
    pub fn require_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.required_paths.push(path.into());
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Load, merge and validate
    pub fn load(&self) -> Result<MonitorConfig, ConfigError> {
        let mut builder = ::config::Config::builder();

        for path in &self.config_paths {
            debug!(path = %path.display(), exists = path.exists(), "optional config source");
            builder = builder.add_source(
                ::config::File::from(path.as_path())
                    .format(::config::FileFormat::Toml)
                    .required(false),
            );
        }
        for path in &self.required_paths {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }
            debug!(path = %path.display(), "required config source");
            builder = builder.add_source(
                ::config::File::from(path.as_path()).format(::config::FileFormat::Toml),
            );
        }
        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                ::config::Environment::with_prefix(prefix)
                    .prefix_separator(paths::ENV_SEPARATOR)
                    .separator(paths::ENV_SEPARATOR)
                    .try_parsing(true),
            );
        }

        let config: MonitorConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a single TOML file, ignoring other sources
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<MonitorConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: MonitorConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write a configuration as TOML
    pub fn export_config<P: AsRef<Path>>(config: &MonitorConfig, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, config.to_toml()?)?;
        Ok(())
    }
}
