//! Terminal report.

use colored::Colorize;
use std::io::Write;
use tracing::debug;

use crate::analysis::{ConsolidatedResult, DecisionMaker};

use super::Report;
use super::section::{Section, SectionKind, build_sections};
use super::table::{Answers, TableStyle, render_table};

const ANSWERS: Answers = Answers { yes: "yes", no: "no" };

/// Box-drawn tables under coloured headings.
#[derive(Debug, Default)]
pub struct TerminalReport {
    sections: Vec<Section>,
}

impl TerminalReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Formats a section heading with color.
    fn heading(section: &Section) -> String {
        let text = format!(
            "{}: {}",
            section.kind.caption().to_uppercase(),
            section.rows.len()
        );
        match section.kind {
            SectionKind::Deleted => text.red().bold().to_string(),
            SectionKind::Created => text.green().bold().to_string(),
            SectionKind::Updated => text.yellow().bold().to_string(),
            SectionKind::Unchanged => text.dimmed().to_string(),
        }
    }
}

impl Report for TerminalReport {
    fn prepare(&mut self, result: &ConsolidatedResult, decision: &DecisionMaker) {
        debug!("Preparing terminal report");
        self.sections = build_sections(result, decision);
    }

    fn render(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for section in &self.sections {
            writeln!(out, "{}", Self::heading(section))?;
            writeln!(out, "{}\n", render_table(section, ANSWERS, TableStyle::Modern))?;
        }
        Ok(())
    }
}
