// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # tf-plan-reporter
//!
//! Audits Terraform plan files before they are applied and reports which
//! resources would be created, updated, deleted or left alone, flagging the
//! removal of critical resources.
//!
//! ## Overview
//!
//! - Find every plan file with a given base name under a search folder
//! - Convert each of them with `terraform show -json`, several at once
//! - Consolidate all resource changes into one categorized result
//! - Judge every deletion against a critical-resource policy
//! - Print terminal/JSON reports and write a GitHub markdown report
//!
//! ## Modules
//!
//! - [`config`]: Settings parsing, validation and the removal policy
//! - [`collector`]: Plan discovery, extraction and bounded fan-in
//! - [`analysis`]: Action classification, consolidation and decisions
//! - [`report`]: Markdown, terminal and JSON reports
//! - [`pipeline`]: The audit run and the removal gate
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! terraform_binary_file: terraform
//! terraform_plan_file_basename: plan.bin
//! terraform_plan_search_folder: ./live
//! critical_resources:
//!   - all
//! allowed_removals:
//!   - null_resource
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod analysis;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

// ============================================================================
// Re-exports
// ============================================================================

pub use analysis::{ChangeAction, ConsolidatedResult, DecisionMaker, ResourceChangeRecord};
pub use cli::{Cli, Commands, OutputFormat};
pub use collector::{PlanCollector, PlanExtractor, TerraformPlan, TerraformShow, WorkdirStrategy};
pub use config::{ConfigParser, ConfigValidator, DefensePlan, Settings};
pub use error::{ReporterError, Result};
pub use pipeline::{Auditor, check_gate};
pub use report::{JsonReport, MarkdownReport, Report, TerminalReport, publish};
