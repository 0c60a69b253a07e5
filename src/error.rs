//! Error types for the plan reporter.
//!
//! Every layer returns a typed error carrying enough context (path, command
//! line, underlying cause) for the binary to print a single diagnostic line
//! and exit. Nothing in the pipeline retries.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ValidationError;

/// The main error type for the plan reporter.
#[derive(Debug, Error)]
pub enum ReporterError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan discovery and extraction errors.
    #[error("Plan collection error: {0}")]
    Collect(#[from] CollectError),

    /// Report rendering errors.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// The removal gate tripped.
    #[error("There are critical resources removal in the report ({count} forbidden deletion(s))")]
    CriticalRemovals {
        /// Number of deleted records judged forbidden.
        count: usize,
    },

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration{}: {message}", format_location(.location.as_deref()))]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// One or more validation rules failed.
    #[error("Configuration validation failed with {} violation(s):\n{}", .violations.len(), format_violations(.violations))]
    ValidationFailed {
        /// Every violation found, in check order.
        violations: Vec<ValidationError>,
    },
}

/// Plan discovery and extraction errors.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The search root could not be turned into an absolute path.
    #[error("Cannot resolve search folder {path}: {source}")]
    RootResolution {
        /// The configured search folder.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Walking the directory tree failed.
    #[error("Failed to walk directory tree under {root}: {source}")]
    Traversal {
        /// Root of the traversal.
        root: PathBuf,
        /// Underlying walk error (carries the failing path).
        source: walkdir::Error,
    },

    /// The converter binary could not be resolved.
    #[error("Converter binary not found: {binary}")]
    BinaryNotFound {
        /// The configured binary.
        binary: String,
    },

    /// The converter process could not be launched.
    #[error("Failed to launch '{command}': {source}")]
    Launch {
        /// Rendered command line.
        command: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The converter exited unsuccessfully.
    #[error("Command '{command}' failed with {status}")]
    ConverterFailed {
        /// Rendered command line.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The converter output was not a valid plan document.
    #[error("Could not decode plan JSON produced for {artifact}: {source}")]
    Decode {
        /// Plan artifact that was converted.
        artifact: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// No plan artifact was discovered and the caller asked to fail on that.
    #[error("No plan file named '{basename}' found under {root}")]
    NoPlansFound {
        /// Base name searched for.
        basename: String,
        /// Root of the search.
        root: PathBuf,
    },

    /// The result channel closed before every plan was delivered.
    #[error("Result channel closed after {received} of {expected} plans")]
    ChannelClosed {
        /// Number of results expected.
        expected: usize,
        /// Number of results received.
        received: usize,
    },
}

/// Report rendering errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report destination could not be created or written.
    #[error("Failed to write report to {destination}: {source}")]
    Write {
        /// Destination description (file path or stdout).
        destination: String,
        /// Underlying IO error, serialization failures included.
        source: std::io::Error,
    },
}

/// Result type alias for plan reporter operations.
pub type Result<T> = std::result::Result<T, ReporterError>;

impl ReporterError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Process exit code for this error.
    ///
    /// The removal gate is distinguished from operational failures so CI
    /// jobs can tell "policy said no" apart from "the audit broke".
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::CriticalRemovals { .. } => 2,
            _ => 1,
        }
    }
}

/// Renders ` in <location>` for parse errors that know their source.
fn format_location(location: Option<&str>) -> String {
    location.map(|l| format!(" in {l}")).unwrap_or_default()
}

impl ConfigError {
    /// Creates a parse error with an optional location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }
}

impl CollectError {
    /// Returns the captured stderr of a failed converter run, if any.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::ConverterFailed { stderr, .. } => Some(stderr.as_str()),
            _ => None,
        }
    }
}

fn format_violations(violations: &[ValidationError]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
