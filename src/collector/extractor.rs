//! Plan extraction through the external converter.
//!
//! The converter is `terraform show -json`, run once per plan artifact. The
//! orchestrating process never changes its own working directory; the
//! strategy only decides which arguments are passed.

use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::{CollectError, Result};

use super::plan::TerraformPlan;

/// How the converter is pointed at a plan artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkdirStrategy {
    /// `-chdir=<artifact dir> show -json -no-color <basename>`.
    #[default]
    Chdir,
    /// `show -json -no-color <full path>`, resolved from the process directory.
    NoChdir,
}

/// Turns a plan artifact into a structured plan.
#[async_trait]
pub trait PlanExtractor: Send + Sync {
    /// Extracts the plan stored in `artifact`.
    async fn extract(&self, artifact: &Path) -> Result<TerraformPlan>;
}

/// Extractor invoking `<binary> show -json`.
#[derive(Debug, Clone)]
pub struct TerraformShow {
    /// Resolved converter binary.
    binary: PathBuf,
    /// Argument strategy.
    strategy: WorkdirStrategy,
}

/// Resolves the converter binary.
///
/// Values with a path separator are joined to `working_dir` and must name an
/// executable regular file. Bare names resolve to the first executable of
/// that name on `PATH`.
#[must_use]
pub fn resolve_binary(binary: &str, working_dir: &Path) -> Option<PathBuf> {
    let search = std::env::var_os("PATH").unwrap_or_default();
    resolve_binary_in(binary, working_dir, &search)
}

/// [`resolve_binary`] against an explicit search path.
fn resolve_binary_in(binary: &str, working_dir: &Path, search: &OsStr) -> Option<PathBuf> {
    let candidate = Path::new(binary);
    if candidate.as_os_str().is_empty() {
        return None;
    }

    if candidate.is_absolute() || candidate.components().count() > 1 {
        let path = working_dir.join(candidate);
        return is_executable(&path).then_some(path);
    }

    std::env::split_paths(search)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(candidate))
        .find(|path| is_executable(path))
}

/// Returns true if `path` is a regular file with an execute bit set.
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    let executable = {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    };
    #[cfg(not(unix))]
    let executable = true;

    executable
}

impl TerraformShow {
    /// Creates an extractor, resolving `binary` against the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::BinaryNotFound`] if the binary cannot be resolved.
    pub fn new(binary: &str, strategy: WorkdirStrategy) -> Result<Self> {
        let working_dir = std::env::current_dir()?;
        Self::with_working_dir(binary, strategy, &working_dir)
    }

    /// Creates an extractor, resolving `binary` against `working_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::BinaryNotFound`] if the binary cannot be resolved.
    pub fn with_working_dir(
        binary: &str,
        strategy: WorkdirStrategy,
        working_dir: &Path,
    ) -> Result<Self> {
        let resolved = resolve_binary(binary, working_dir).ok_or_else(|| {
            CollectError::BinaryNotFound {
                binary: binary.to_string(),
            }
        })?;

        debug!(binary = %resolved.display(), ?strategy, "Converter binary resolved");
        Ok(Self {
            binary: resolved,
            strategy,
        })
    }

    /// Returns the resolved binary.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Returns the strategy in use.
    #[must_use]
    pub const fn strategy(&self) -> WorkdirStrategy {
        self.strategy
    }

    /// Builds the converter arguments for `artifact`.
    #[must_use]
    pub fn command_args(&self, artifact: &Path) -> Vec<OsString> {
        let mut args = Vec::with_capacity(5);

        let target = match (self.strategy, artifact.parent(), artifact.file_name()) {
            (WorkdirStrategy::Chdir, Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
                let mut chdir = OsString::from("-chdir=");
                chdir.push(parent.as_os_str());
                args.push(chdir);
                name.to_os_string()
            }
            _ => artifact.as_os_str().to_os_string(),
        };

        args.extend(["show", "-json", "-no-color"].map(OsString::from));
        args.push(target);
        args
    }

    /// Renders the command line for logs and errors.
    fn render_command(&self, args: &[OsString]) -> String {
        std::iter::once(self.binary.as_os_str())
            .chain(args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl PlanExtractor for TerraformShow {
    async fn extract(&self, artifact: &Path) -> Result<TerraformPlan> {
        let args = self.command_args(artifact);
        let command = self.render_command(&args);
        debug!(plan_file = %artifact.display(), %command, "Running converter");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CollectError::Launch {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(plan_file = %artifact.display(), %command, "Converter failed");
            debug!(%stderr, "Converter stderr");
            return Err(CollectError::ConverterFailed {
                command,
                status: output.status.to_string(),
                stderr,
            }
            .into());
        }

        let plan = TerraformPlan::from_slice(&output.stdout).map_err(|source| {
            CollectError::Decode {
                artifact: artifact.to_path_buf(),
                source,
            }
        })?;

        debug!(
            plan_file = %artifact.display(),
            changes = plan.resource_changes.len(),
            "Plan extracted"
        );
        Ok(plan)
    }
}
