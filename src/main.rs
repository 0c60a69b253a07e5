//! tf-plan-reporter CLI entrypoint.
//!
//! This is the main entrypoint for the tf-plan-reporter command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tf_plan_reporter::cli::{Cli, Commands, OutputFormat};
use tf_plan_reporter::config::{
    ConfigParser, ConfigValidator, EXAMPLE_CONFIG, Settings, ValidationResult, find_config_file,
};
use tf_plan_reporter::error::{ReporterError, Result};
use tf_plan_reporter::pipeline::{Auditor, check_gate};
use tf_plan_reporter::report::publish;

use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.no_color);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initializes the logging system. Logs go to stderr, reports to stdout.
fn init_logging(verbose: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    if no_color {
        colored::control::set_override(false);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Report {
            report_file,
            keep_gate,
            zero_plan_fail,
            jobs,
        } => {
            cmd_report(
                cli.config.as_ref(),
                cli.output,
                report_file.as_deref(),
                keep_gate,
                zero_plan_fail,
                jobs,
            )
            .await
        }
        Commands::Validate { warnings } => cmd_validate(cli.config.as_ref(), cli.output, warnings),
        Commands::Example => cmd_example(),
    }
}

/// Audit plans and publish the reports.
async fn cmd_report(
    config_path: Option<&PathBuf>,
    output: OutputFormat,
    report_file: Option<&Path>,
    keep_gate: bool,
    zero_plan_fail: bool,
    jobs: Option<usize>,
) -> Result<()> {
    let settings = load_settings(config_path)?;
    let validation = ConfigValidator::new()?.validate(&settings)?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }

    let auditor = Auditor::new(&settings)?
        .with_parallelism(jobs)
        .fail_on_zero_plans(zero_plan_fail);

    let result = auditor.collect().await?;
    let decision = auditor.decision_maker();

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    publish(&result, &decision, output, report_file, &mut handle)?;

    if decision.critical_removals_found() {
        if keep_gate {
            return check_gate(&result, &decision);
        }
        warn!("Critical resource removals found, gate is disabled");
    } else {
        info!("No critical resource removals found");
    }

    Ok(())
}

/// Validate the settings file.
fn cmd_validate(config_path: Option<&PathBuf>, output: OutputFormat, show_warnings: bool) -> Result<()> {
    let settings = load_settings(config_path)?;
    let validation = ConfigValidator::new()?.validate(&settings)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_validation(&mut handle, &validation, output, show_warnings)
        .map_err(ReporterError::from)
}

/// Writes the outcome of a successful validation.
fn write_validation(
    out: &mut dyn Write,
    validation: &ValidationResult,
    output: OutputFormat,
    show_warnings: bool,
) -> std::io::Result<()> {
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": validation.is_valid(),
                "warnings": validation.warnings,
            });
            serde_json::to_writer_pretty(&mut *out, &json)?;
            writeln!(out)
        }
        OutputFormat::Text => {
            writeln!(out, "Configuration is valid.")?;
            if show_warnings {
                for warning in &validation.warnings {
                    writeln!(out, "  warning: {warning}")?;
                }
            } else if validation.warning_count() > 0 {
                writeln!(
                    out,
                    "{} warning(s), use --warnings to show them.",
                    validation.warning_count()
                )?;
            }
            Ok(())
        }
    }
}

/// Print the example settings file.
fn cmd_example() -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(EXAMPLE_CONFIG.as_bytes())?;
    handle.flush()?;
    Ok(())
}

/// Loads settings from the given file or the nearest default one.
fn load_settings(config_path: Option<&PathBuf>) -> Result<Settings> {
    let path = match config_path {
        Some(path) => path.clone(),
        None => find_config_file(std::env::current_dir()?)?,
    };

    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
    debug!(config = %path.display(), "Using settings file");

    let parser = ConfigParser::new().with_base_path(base);
    parser.load_dotenv()?;
    parser.load_with_env(&path)
}
