//! Consolidation of every plan's resource changes.

use serde::Serialize;
use tracing::debug;

use crate::collector::{ResourceChange, TerraformPlan};

use super::action::ChangeAction;

/// One resource mutation reported by one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceChangeRecord {
    /// Resource type identifier.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource name.
    pub name: String,
    /// `count`/`for_each` key, empty when the resource has none.
    pub index: String,
    /// Category the record is filed under.
    pub action: ChangeAction,
}

/// All resource changes of a run, by category, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidatedResult {
    /// Resources to be created (replacements included).
    pub created: Vec<ResourceChangeRecord>,
    /// Resources to be updated in place.
    pub updated: Vec<ResourceChangeRecord>,
    /// Resources to be destroyed.
    pub deleted: Vec<ResourceChangeRecord>,
    /// Resources left unchanged.
    pub unchanged: Vec<ResourceChangeRecord>,
    /// Number of plans absorbed.
    pub plans: usize,
    /// Entries without any recognized action.
    pub skipped: usize,
}

impl ResourceChangeRecord {
    /// Builds a record from a plan entry, or `None` if it carries no
    /// recognized action.
    #[must_use]
    pub fn from_change(change: &ResourceChange) -> Option<Self> {
        let action = ChangeAction::classify(&change.change.actions)?;
        Some(Self {
            resource_type: change.resource_type.clone(),
            name: change.name.clone(),
            index: normalize_index(change.index.as_ref()),
            action,
        })
    }
}

/// Renders a `count`/`for_each` key as text.
///
/// Absent or null keys become an empty string, numbers their decimal form,
/// strings are kept verbatim and anything else becomes compact JSON.
#[must_use]
pub fn normalize_index(index: Option<&serde_json::Value>) -> String {
    match index {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(key)) => key.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

impl ConsolidatedResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consolidates a sequence of plans in order.
    #[must_use]
    pub fn from_plans<'a>(plans: impl IntoIterator<Item = &'a TerraformPlan>) -> Self {
        let mut result = Self::new();
        for plan in plans {
            result.absorb(plan);
        }
        result
    }

    /// Files every entry of `plan` into its category.
    pub fn absorb(&mut self, plan: &TerraformPlan) {
        for change in &plan.resource_changes {
            let Some(record) = ResourceChangeRecord::from_change(change) else {
                debug!(
                    resource_type = %change.resource_type,
                    name = %change.name,
                    actions = ?change.change.actions,
                    "Resource change has no reportable action, skipping"
                );
                self.skipped += 1;
                continue;
            };

            match record.action {
                ChangeAction::Create => self.created.push(record),
                ChangeAction::Update => self.updated.push(record),
                ChangeAction::Delete => self.deleted.push(record),
                ChangeAction::NoOp => self.unchanged.push(record),
            }
        }
        self.plans += 1;
    }

    /// Number of filed records across all categories.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.created.len() + self.updated.len() + self.deleted.len() + self.unchanged.len()
    }

    /// Returns true if nothing was filed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}
