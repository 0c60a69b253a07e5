//! GitHub markdown report, meant to be posted as a pull request comment.

use std::io::Write;
use tracing::debug;

use crate::analysis::{ConsolidatedResult, DecisionMaker};

use super::Report;
use super::section::{Section, SectionKind, build_sections};
use super::table::{Answers, TableStyle, render_table};

const ANSWERS: Answers = Answers {
    yes: ":white_check_mark:",
    no: ":x:",
};

/// Markdown report with emoji markers.
#[derive(Debug, Default)]
pub struct MarkdownReport {
    sections: Vec<Section>,
}

impl MarkdownReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    const fn marker(kind: SectionKind) -> &'static str {
        match kind {
            SectionKind::Deleted => ":red_circle:",
            SectionKind::Created => ":green_circle:",
            SectionKind::Updated => ":orange_circle:",
            SectionKind::Unchanged => ":white_circle:",
        }
    }
}

impl Report for MarkdownReport {
    fn prepare(&mut self, result: &ConsolidatedResult, decision: &DecisionMaker) {
        debug!("Preparing markdown report");
        self.sections = build_sections(result, decision);
    }

    fn render(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for section in &self.sections {
            debug!(section = section.kind.key(), rows = section.rows.len(), "Rendering markdown section");
            writeln!(
                out,
                "### {} {}: {}\n",
                Self::marker(section.kind),
                section.kind.caption(),
                section.rows.len()
            )?;
            writeln!(out, "{}\n", render_table(section, ANSWERS, TableStyle::Markdown))?;
        }
        Ok(())
    }
}
