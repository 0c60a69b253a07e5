//! Configuration module for the plan reporter.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing the YAML settings file
//! - Validation of settings values
//! - Deriving the removal policy enforced by the decision engine

mod example;
mod parser;
mod policy;
mod spec;
mod validator;

pub use example::EXAMPLE_CONFIG;
pub use parser::{
    ConfigParser, DEFAULT_CONFIG_FILES, ENV_BINARY_FILE, ENV_NOT_USE_CHDIR, ENV_PLAN_BASENAME,
    ENV_SEARCH_FOLDER, apply_overrides, find_config_file,
};
pub use policy::{DefensePlan, normalize_type};
pub use spec::{ALL_RESOURCES, Settings, is_all_sentinel};
pub use validator::{
    ConfigValidator, PROVIDERS_FOLDER, ValidationError, ValidationResult, providers_folder_exists,
};
