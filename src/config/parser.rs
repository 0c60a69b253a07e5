//! Configuration parser for loading settings files.
//!
//! This module handles loading settings from YAML files, `.env` files and
//! environment variables, with proper precedence and error handling.

use crate::error::{ConfigError, ReporterError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::Settings;

/// Environment override for `terraform_binary_file`.
pub const ENV_BINARY_FILE: &str = "TF_PLAN_REPORTER_BINARY_FILE";
/// Environment override for `terraform_plan_file_basename`.
pub const ENV_PLAN_BASENAME: &str = "TF_PLAN_REPORTER_PLAN_BASENAME";
/// Environment override for `terraform_plan_search_folder`.
pub const ENV_SEARCH_FOLDER: &str = "TF_PLAN_REPORTER_SEARCH_FOLDER";
/// Environment override for `not_use_chdir`.
pub const ENV_NOT_USE_CHDIR: &str = "TF_PLAN_REPORTER_NOT_USE_CHDIR";

/// Configuration parser for loading reporter settings.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for locating the `.env` file.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path used to locate the `.env` file.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Settings> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ReporterError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ReporterError::Config(ConfigError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            ))
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses settings from a YAML string.
    ///
    /// A document without any content yields default (empty) settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<Settings> {
        debug!("Parsing YAML configuration");

        if content.trim().is_empty() {
            debug!("Configuration document is empty, using defaults");
            return Ok(Settings::default());
        }

        let settings: Settings = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            ReporterError::Config(ConfigError::parse(format!("YAML parse error: {e}"), location))
        })?;

        debug!(
            critical = settings.critical_resources.len(),
            allowed = settings.allowed_removals.len(),
            "Successfully parsed configuration"
        );
        Ok(settings)
    }

    /// Loads settings with environment variable overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<Settings> {
        let mut settings = self.load_file(path)?;
        apply_overrides(&mut settings, |key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ReporterError::Config(ConfigError::parse(
                    format!("Failed to load .env file: {e}"),
                    Some(env_path.display().to_string()),
                ))
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Applies overrides looked up through `lookup` (normally the process environment).
pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(binary) = lookup(ENV_BINARY_FILE) {
        debug!("Overriding terraform_binary_file from environment");
        settings.terraform_binary_file = binary;
    }

    if let Some(basename) = lookup(ENV_PLAN_BASENAME) {
        debug!("Overriding terraform_plan_file_basename from environment");
        settings.terraform_plan_file_basename = basename;
    }

    if let Some(folder) = lookup(ENV_SEARCH_FOLDER) {
        debug!("Overriding terraform_plan_search_folder from environment");
        settings.terraform_plan_search_folder = folder;
    }

    if let Some(flag) = lookup(ENV_NOT_USE_CHDIR) {
        debug!("Overriding not_use_chdir from environment");
        settings.not_use_chdir = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
    }
}

/// Default settings file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "tf-plan-reporter.yaml",
    "tf-plan-reporter.yml",
    ".tf-plan-reporter.yaml",
];

/// Finds the settings file in the start directory or its parents.
///
/// # Errors
///
/// Returns an error if no settings file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(ReporterError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}
