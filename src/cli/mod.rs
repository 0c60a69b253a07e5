//! CLI module for the plan reporter.
//!
//! This module provides the command-line interface definitions.

mod commands;

pub use commands::{Cli, Commands, OutputFormat};
