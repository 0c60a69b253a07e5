//! Table rendering of report sections.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::section::Section;

/// Table border style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// GitHub-flavoured markdown.
    Markdown,
    /// Box drawing characters for terminals.
    Modern,
}

/// Words used for the removal verdict column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answers {
    /// Shown when the removal is allowed.
    pub yes: &'static str,
    /// Shown when the removal is forbidden.
    pub no: &'static str,
}

/// Row of the deleted section.
#[derive(Tabled)]
struct DeletedRow {
    #[tabled(rename = "Allowed to remove")]
    allowed: String,
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Index (if any)")]
    index: String,
}

/// Row of every other section.
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Index (if any)")]
    index: String,
}

/// Renders one section as a table.
///
/// The verdict column appears only when the rows carry verdicts.
pub fn render_table(section: &Section, answers: Answers, style: TableStyle) -> String {
    let mut table = if section.rows.iter().any(|row| row.allowed.is_some()) {
        Table::new(section.rows.iter().map(|row| DeletedRow {
            allowed: match row.allowed {
                Some(true) => answers.yes.to_string(),
                Some(false) => answers.no.to_string(),
                None => String::new(),
            },
            resource_type: row.resource_type.clone(),
            name: row.name.clone(),
            index: row.index.clone(),
        }))
    } else {
        Table::new(section.rows.iter().map(|row| ResourceRow {
            resource_type: row.resource_type.clone(),
            name: row.name.clone(),
            index: row.index.clone(),
        }))
    };

    match style {
        TableStyle::Markdown => {
            table.with(Style::markdown());
        }
        TableStyle::Modern => {
            table.with(Style::modern());
        }
    }

    table.to_string()
}
