//! Settings validation.
//!
//! Every rule is checked and every violation is collected, so the user sees
//! the complete list of problems in one run instead of fixing them one by one.

use crate::collector::{is_executable, resolve_binary};
use crate::error::{ConfigError, ReporterError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::spec::Settings;

/// Provider plugin folder that must exist in the working directory when
/// `not_use_chdir` is enabled.
pub const PROVIDERS_FOLDER: &str = ".terraform/providers";

/// Validator for reporter settings.
#[derive(Debug)]
pub struct ConfigValidator {
    /// Directory relative paths are resolved against.
    working_dir: PathBuf,
}

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The settings key that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a validator resolving paths against the process working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new() -> Result<Self> {
        let working_dir = std::env::current_dir()
            .map_err(|e| ReporterError::internal(format!("Cannot determine current directory: {e}")))?;
        Ok(Self::with_working_dir(working_dir))
    }

    /// Creates a validator resolving paths against `working_dir`.
    #[must_use]
    pub fn with_working_dir(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Validates reporter settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationFailed`] listing every violation.
    pub fn validate(&self, settings: &Settings) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        Self::validate_mandatory(settings, &mut result);
        Self::validate_policy_lists(settings, &mut result);
        self.validate_paths(settings, &mut result);
        Self::collect_warnings(settings, &mut result);

        if result.errors.is_empty() {
            debug!("Configuration validation passed");
            Ok(result)
        } else {
            Err(ReporterError::Config(ConfigError::ValidationFailed {
                violations: result.errors,
            }))
        }
    }

    /// Mandatory keys must not be empty strings.
    fn validate_mandatory(settings: &Settings, result: &mut ValidationResult) {
        let mandatory = [
            ("terraform_binary_file", &settings.terraform_binary_file),
            ("terraform_plan_file_basename", &settings.terraform_plan_file_basename),
            ("terraform_plan_search_folder", &settings.terraform_plan_search_folder),
        ];

        for (field, value) in mandatory {
            debug!(field, "Checking that mandatory parameter is not empty");
            if value.trim().is_empty() {
                result.errors.push(ValidationError::new(
                    field,
                    "config file parameter should not be an empty string",
                ));
            }
        }
    }

    /// Exactly one of `critical_resources` / `allowed_removals` may drive the policy.
    fn validate_policy_lists(settings: &Settings, result: &mut ValidationResult) {
        let all_critical = settings.is_all_critical();

        if all_critical && settings.critical_resources.len() > 1 {
            result.errors.push(ValidationError::new(
                "critical_resources",
                "if the list contains 'all', its length must not be greater than 1 to prevent ambiguity",
            ));
        }

        if !all_critical
            && !settings.critical_resources.is_empty()
            && !settings.allowed_removals.is_empty()
        {
            result.errors.push(ValidationError::new(
                "allowed_removals",
                "must be empty when 'critical_resources' lists particular resource types",
            ));
        }

        if settings.critical_resources.is_empty() && settings.allowed_removals.is_empty() {
            result.errors.push(ValidationError::new(
                "critical_resources",
                "either 'critical_resources' or 'allowed_removals' must be specified",
            ));
        }
    }

    /// Filesystem checks; skipped for keys already reported as empty.
    fn validate_paths(&self, settings: &Settings, result: &mut ValidationResult) {
        let binary = settings.terraform_binary_file.trim();
        if !binary.is_empty() {
            self.validate_binary(binary, result);
        }

        let folder = settings.terraform_plan_search_folder.trim();
        if !folder.is_empty() {
            let path = self.working_dir.join(folder);
            debug!(path = %path.display(), "Checking that search folder exists");
            match std::fs::metadata(&path) {
                Err(e) => result.errors.push(ValidationError::new(
                    "terraform_plan_search_folder",
                    format!("cannot access '{}': {e}", path.display()),
                )),
                Ok(meta) if !meta.is_dir() => result.errors.push(ValidationError::new(
                    "terraform_plan_search_folder",
                    format!("path should not be regular file, but folder instead: '{}'", path.display()),
                )),
                Ok(_) => {}
            }
        }

        if settings.not_use_chdir {
            debug!("Checking that the providers folder exists, 'not_use_chdir': true");
            if !providers_folder_exists(&self.working_dir) {
                result.errors.push(ValidationError::new(
                    "not_use_chdir",
                    format!(
                        "terraform providers folder ({PROVIDERS_FOLDER}) was not found in '{}', which is mandatory with 'not_use_chdir: true'",
                        self.working_dir.display()
                    ),
                ));
            }
        }
    }

    /// The converter must be an executable regular file or a command on `PATH`.
    fn validate_binary(&self, binary: &str, result: &mut ValidationResult) {
        let candidate = Path::new(binary);
        let path_like = candidate.is_absolute() || candidate.components().count() > 1;

        if path_like {
            let path = self.working_dir.join(candidate);
            debug!(path = %path.display(), "Checking that converter binary exists");
            match std::fs::metadata(&path) {
                Err(e) => result.errors.push(ValidationError::new(
                    "terraform_binary_file",
                    format!("cannot access '{}': {e}", path.display()),
                )),
                Ok(meta) if meta.is_dir() => result.errors.push(ValidationError::new(
                    "terraform_binary_file",
                    format!("path should not be folder, but regular file instead: '{}'", path.display()),
                )),
                Ok(_) if !is_executable(&path) => result.errors.push(ValidationError::new(
                    "terraform_binary_file",
                    format!("file is not executable: '{}'", path.display()),
                )),
                Ok(_) => {}
            }
        } else if resolve_binary(binary, &self.working_dir).is_none() {
            result.errors.push(ValidationError::new(
                "terraform_binary_file",
                format!("command '{binary}' was not found on PATH"),
            ));
        }
    }

    /// Non-fatal oddities worth pointing out.
    fn collect_warnings(settings: &Settings, result: &mut ValidationResult) {
        if settings.terraform_plan_file_basename.contains(['/', '\\']) {
            result.warnings.push(format!(
                "terraform_plan_file_basename: '{}' contains a path separator and will never match a file name",
                settings.terraform_plan_file_basename
            ));
        }

        for (field, items) in [
            ("critical_resources", &settings.critical_resources),
            ("allowed_removals", &settings.allowed_removals),
        ] {
            let mut seen = HashSet::new();
            for item in items {
                let key = item.trim().to_lowercase();
                if !seen.insert(key) {
                    result
                        .warnings
                        .push(format!("{field}: duplicate entry '{item}'"));
                }
            }
        }

        if !settings.is_all_critical()
            && settings.critical_resources.is_empty()
            && !settings.allowed_removals.is_empty()
        {
            result.warnings.push(String::from(
                "allowed_removals: ignored unless 'critical_resources' is [all]; every removal will be allowed",
            ));
        }

        if settings
            .critical_resources
            .iter()
            .any(|item| item.trim().is_empty())
        {
            result
                .warnings
                .push(String::from("critical_resources: contains an empty entry"));
        }
    }
}

/// Returns true if `<prefix>/.terraform/providers` exists and is a directory.
#[must_use]
pub fn providers_folder_exists(prefix: &Path) -> bool {
    let folder = prefix.join(PROVIDERS_FOLDER);
    match std::fs::symlink_metadata(&folder) {
        Ok(meta) if meta.is_dir() => {
            debug!("Provider folder was successfully found: {}", folder.display());
            true
        }
        Ok(_) => {
            debug!("The path is not a folder: {}", folder.display());
            false
        }
        Err(_) => {
            debug!("Provider folder does not exist: {}", folder.display());
            false
        }
    }
}

impl ValidationError {
    /// Creates a validation error for a settings key.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
        settings: Settings,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir(temp.path().join("some_folder")).expect("Failed to create folder");
        std::fs::write(temp.path().join("terraform"), "").expect("Failed to create binary");
        #[cfg(unix)]
        set_mode(&temp.path().join("terraform"), 0o755);

        let settings = Settings {
            terraform_binary_file: temp.path().join("terraform").display().to_string(),
            terraform_plan_file_basename: String::from("tfplan.bin"),
            terraform_plan_search_folder: String::from("some_folder"),
            critical_resources: vec![String::from("all")],
            allowed_removals: vec![
                String::from("resource1"),
                String::from("resource2"),
                String::from("resource3"),
            ],
            not_use_chdir: false,
        };

        Fixture { temp, settings }
    }

    #[cfg(unix)]
    fn set_mode(path: &Path, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .expect("Failed to set permissions");
    }

    fn violations(fx: &Fixture) -> Vec<ValidationError> {
        match ConfigValidator::with_working_dir(fx.temp.path()).validate(&fx.settings) {
            Err(ReporterError::Config(ConfigError::ValidationFailed { violations })) => violations,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => Vec::new(),
        }
    }

    fn has_violation(violations: &[ValidationError], field: &str) -> bool {
        violations.iter().any(|v| v.field == field)
    }

    #[test]
    fn test_valid_settings() {
        let fx = fixture();
        let result = ConfigValidator::with_working_dir(fx.temp.path())
            .validate(&fx.settings)
            .expect("settings should be valid");
        assert!(result.is_valid());
    }

    #[test]
    fn test_empty_mandatory_parameters_are_all_reported() {
        let mut fx = fixture();
        fx.settings.terraform_binary_file.clear();
        fx.settings.terraform_plan_file_basename.clear();
        fx.settings.terraform_plan_search_folder.clear();

        let found = violations(&fx);
        assert_eq!(found.len(), 3);
        assert!(has_violation(&found, "terraform_binary_file"));
        assert!(has_violation(&found, "terraform_plan_file_basename"));
        assert!(has_violation(&found, "terraform_plan_search_folder"));
    }

    #[test]
    fn test_all_must_be_the_only_item() {
        let mut fx = fixture();
        fx.settings
            .critical_resources
            .extend([String::from("resource1"), String::from("resource2")]);

        let found = violations(&fx);
        assert!(has_violation(&found, "critical_resources"));
    }

    #[test]
    fn test_particular_critical_list_requires_empty_allowed_list() {
        let mut fx = fixture();
        fx.settings.critical_resources = vec![String::from("resource1"), String::from("resource2")];

        let found = violations(&fx);
        assert!(has_violation(&found, "allowed_removals"));
    }

    #[test]
    fn test_both_policy_lists_empty() {
        let mut fx = fixture();
        fx.settings.critical_resources.clear();
        fx.settings.allowed_removals.clear();

        let found = violations(&fx);
        assert!(has_violation(&found, "critical_resources"));
    }

    #[test]
    fn test_absent_binary_file() {
        let mut fx = fixture();
        fx.settings.terraform_binary_file.push_str("_absent");

        let found = violations(&fx);
        assert!(has_violation(&found, "terraform_binary_file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_binary_file_must_be_executable() {
        let fx = fixture();
        set_mode(&fx.temp.path().join("terraform"), 0o644);

        let found = violations(&fx);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field, "terraform_binary_file");
        assert!(found[0].message.contains("not executable"));
    }

    #[test]
    fn test_binary_file_must_not_be_folder() {
        let mut fx = fixture();
        fx.settings.terraform_binary_file = String::from("./some_folder");

        let found = violations(&fx);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("regular file"));
    }

    #[test]
    fn test_search_folder_must_not_be_file() {
        let mut fx = fixture();
        fx.settings.terraform_plan_search_folder = String::from("terraform");

        let found = violations(&fx);
        assert!(has_violation(&found, "terraform_plan_search_folder"));
    }

    #[test]
    fn test_no_chdir_requires_providers_folder() {
        let mut fx = fixture();
        fx.settings.not_use_chdir = true;

        let found = violations(&fx);
        assert!(has_violation(&found, "not_use_chdir"));

        std::fs::create_dir_all(fx.temp.path().join(PROVIDERS_FOLDER))
            .expect("Failed to create providers folder");
        assert!(violations(&fx).is_empty());
    }

    #[test]
    fn test_multiple_problems_reported_together() {
        let mut fx = fixture();
        fx.settings.terraform_plan_file_basename.clear();
        fx.settings.critical_resources = vec![String::from("aws_instance")];
        fx.settings.terraform_plan_search_folder = String::from("missing_folder");

        let found = violations(&fx);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_duplicate_entries_produce_warnings() {
        let mut fx = fixture();
        fx.settings.allowed_removals.push(String::from("RESOURCE1"));

        let result = ConfigValidator::with_working_dir(fx.temp.path())
            .validate(&fx.settings)
            .expect("duplicates are not fatal");
        assert_eq!(result.warning_count(), 1);
    }
}
