//! Report rendering.
//!
//! Every report is prepared once from the consolidated result, which is where
//! deletions are judged by the decision engine, and then rendered to a writer.

mod json;
mod markdown;
mod section;
mod table;
mod terminal;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::analysis::{ConsolidatedResult, DecisionMaker};
use crate::cli::OutputFormat;
use crate::error::{ReportError, Result};

pub use json::JsonReport;
pub use markdown::MarkdownReport;
pub use section::{Section, SectionKind, SectionRow, build_sections};
pub use table::{Answers, TableStyle, render_table};
pub use terminal::TerminalReport;

/// Message written instead of tables when no resource change was found.
pub const NO_DATA_MESSAGE: &str = "THERE IS NO ANY REPORT DATA";

/// A report over one run.
pub trait Report {
    /// Builds the report content, judging every deletion through `decision`.
    fn prepare(&mut self, result: &ConsolidatedResult, decision: &DecisionMaker);

    /// Writes the prepared content.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO or serialization error.
    fn render(&self, out: &mut dyn Write) -> std::io::Result<()>;
}

/// Publishes the reports of a run.
///
/// With `report_file` the markdown report goes to that file; the terminal
/// report (or the JSON document) always goes to `stdout`. Without any
/// resource change the text output is [`NO_DATA_MESSAGE`].
///
/// # Errors
///
/// Returns [`ReportError::Write`] if a destination cannot be created or written.
pub fn publish(
    result: &ConsolidatedResult,
    decision: &DecisionMaker,
    format: OutputFormat,
    report_file: Option<&Path>,
    stdout: &mut dyn Write,
) -> Result<()> {
    let total = result.total_count();
    debug!(total, "Report contains resource changes");

    if let Some(path) = report_file {
        write_markdown_file(path, result, decision)?;
    }

    let mut report: Box<dyn Report> = match format {
        OutputFormat::Json => Box::new(JsonReport::new()),
        OutputFormat::Text if total == 0 => {
            return writeln!(stdout, "{NO_DATA_MESSAGE}").map_err(|e| write_error("stdout", e));
        }
        OutputFormat::Text => Box::new(TerminalReport::new()),
    };

    report.prepare(result, decision);
    report
        .render(stdout)
        .and_then(|()| stdout.flush())
        .map_err(|e| write_error("stdout", e))
}

fn write_markdown_file(path: &Path, result: &ConsolidatedResult, decision: &DecisionMaker) -> Result<()> {
    let destination = path.display().to_string();
    let file = File::create(path).map_err(|e| write_error(&destination, e))?;
    let mut writer = BufWriter::new(file);

    if result.is_empty() {
        writeln!(writer, "{NO_DATA_MESSAGE}").map_err(|e| write_error(&destination, e))?;
    } else {
        let mut markdown = MarkdownReport::new();
        markdown.prepare(result, decision);
        markdown
            .render(&mut writer)
            .map_err(|e| write_error(&destination, e))?;
    }

    writer.flush().map_err(|e| write_error(&destination, e))?;
    info!(report_file = %destination, "Markdown report written");
    Ok(())
}

fn write_error(destination: &str, source: std::io::Error) -> crate::error::ReporterError {
    ReportError::Write {
        destination: destination.to_string(),
        source,
    }
    .into()
}
