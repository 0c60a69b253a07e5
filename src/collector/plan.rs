//! Structured plan document as printed by `terraform show -json`.
//!
//! Only the subset the reporter needs is modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// A decoded plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TerraformPlan {
    /// Plan JSON format version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    /// Version of the tool that produced the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    /// Resource changes, in document order.
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
}

/// One resource entry of a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceChange {
    /// Full resource address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Resource type identifier.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource name.
    pub name: String,
    /// `count` or `for_each` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<serde_json::Value>,
    /// Planned change.
    #[serde(default)]
    pub change: Change,
}

/// Planned change of a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Change {
    /// Actions reported for the resource.
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Raw action string of the plan format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// `create`
    Create,
    /// `read`
    Read,
    /// `update`
    Update,
    /// `delete`
    Delete,
    /// `no-op`
    NoOp,
    /// Any action string this reporter does not know.
    #[serde(other)]
    Other,
}

impl TerraformPlan {
    /// Decodes a plan from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the bytes are not a plan document.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
