//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tf-plan-reporter - Audits Terraform plans for critical resource removals.
#[derive(Parser, Debug)]
#[command(name = "tf-plan-reporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file.
    #[arg(short, long, global = true, env = "TF_PLAN_REPORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colors in logs and terminal reports.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find plan files, consolidate their changes and print the report.
    Report {
        /// Also write the markdown report to this file.
        #[arg(short, long)]
        report_file: Option<PathBuf>,

        /// Exit with a non-zero code when a critical resource removal is found.
        #[arg(long)]
        keep_gate: bool,

        /// Fail when no plan file is found.
        #[arg(long)]
        zero_plan_fail: bool,

        /// Maximum number of plans converted at once (defaults to the CPU count).
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Validate the settings file.
    Validate {
        /// Show all warnings, not just errors.
        #[arg(short, long)]
        warnings: bool,
    },

    /// Print an example settings file.
    Example,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}
