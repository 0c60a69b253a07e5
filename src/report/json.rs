//! JSON report for scripting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::analysis::{ConsolidatedResult, DecisionMaker};

use super::Report;
use super::section::{SectionKind, build_sections};

/// Single JSON document describing the whole run.
#[derive(Debug, Default)]
pub struct JsonReport {
    document: Option<JsonDocument>,
}

#[derive(Debug, Serialize)]
struct JsonDocument {
    generated_at: DateTime<Utc>,
    plans: usize,
    skipped: usize,
    total: usize,
    critical_removals_found: bool,
    deleted: Vec<JsonRecord>,
    created: Vec<JsonRecord>,
    updated: Vec<JsonRecord>,
    unchanged: Vec<JsonRecord>,
}

#[derive(Debug, Serialize)]
struct JsonRecord {
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    index: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_to_remove: Option<bool>,
}

impl JsonReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self { document: None }
    }
}

impl Report for JsonReport {
    fn prepare(&mut self, result: &ConsolidatedResult, decision: &DecisionMaker) {
        let mut document = JsonDocument {
            generated_at: Utc::now(),
            plans: result.plans,
            skipped: result.skipped,
            total: result.total_count(),
            critical_removals_found: false,
            deleted: Vec::new(),
            created: Vec::new(),
            updated: Vec::new(),
            unchanged: Vec::new(),
        };

        for section in build_sections(result, decision) {
            let records = section
                .rows
                .into_iter()
                .map(|row| JsonRecord {
                    resource_type: row.resource_type,
                    name: row.name,
                    index: row.index,
                    allowed_to_remove: row.allowed,
                })
                .collect();

            match section.kind {
                SectionKind::Deleted => document.deleted = records,
                SectionKind::Created => document.created = records,
                SectionKind::Updated => document.updated = records,
                SectionKind::Unchanged => document.unchanged = records,
            }
        }

        document.critical_removals_found = decision.critical_removals_found();
        self.document = Some(document);
    }

    fn render(&self, out: &mut dyn Write) -> std::io::Result<()> {
        if let Some(document) = &self.document {
            serde_json::to_writer_pretty(&mut *out, document)?;
            writeln!(out)?;
        }
        Ok(())
    }
}
