//! Report sections shared by every output format.

use crate::analysis::{ConsolidatedResult, DecisionMaker, ResourceChangeRecord};

/// Kind of a report section, listed in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Resources to be destroyed.
    Deleted,
    /// Resources to be created.
    Created,
    /// Resources to be updated.
    Updated,
    /// Resources left unchanged.
    Unchanged,
}

/// One row of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRow {
    /// Resource type identifier.
    pub resource_type: String,
    /// Resource name.
    pub name: String,
    /// `count`/`for_each` key, possibly empty.
    pub index: String,
    /// Removal verdict, present on deleted rows only.
    pub allowed: Option<bool>,
}

/// A non-empty group of records of one kind, sorted by resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// What the section lists.
    pub kind: SectionKind,
    /// Rows in display order.
    pub rows: Vec<SectionRow>,
}

impl SectionKind {
    /// Output order of sections.
    pub const ORDER: [Self; 4] = [Self::Deleted, Self::Created, Self::Updated, Self::Unchanged];

    /// Section caption.
    #[must_use]
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Deleted => "Resources to be deleted",
            Self::Created => "Resources to be created",
            Self::Updated => "Resources to be updated",
            Self::Unchanged => "Resources to be ignored for change",
        }
    }

    /// Key used in machine-readable output.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }

    fn records(self, result: &ConsolidatedResult) -> &[ResourceChangeRecord] {
        match self {
            Self::Deleted => &result.deleted,
            Self::Created => &result.created,
            Self::Updated => &result.updated,
            Self::Unchanged => &result.unchanged,
        }
    }
}

/// Builds the non-empty sections of `result` in output order.
///
/// Every deleted record is judged through `decision` exactly once.
#[must_use]
pub fn build_sections(result: &ConsolidatedResult, decision: &DecisionMaker) -> Vec<Section> {
    SectionKind::ORDER
        .into_iter()
        .filter_map(|kind| {
            let records = kind.records(result);
            if records.is_empty() {
                return None;
            }

            let mut sorted: Vec<&ResourceChangeRecord> = records.iter().collect();
            sorted.sort_by(|a, b| a.resource_type.cmp(&b.resource_type));

            let rows = sorted
                .into_iter()
                .map(|record| SectionRow {
                    resource_type: record.resource_type.clone(),
                    name: record.name.clone(),
                    index: record.index.clone(),
                    allowed: (kind == SectionKind::Deleted)
                        .then(|| decision.is_allowed_for_removal(&record.resource_type)),
                })
                .collect();

            Some(Section { kind, rows })
        })
        .collect()
}
