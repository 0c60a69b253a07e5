//! Configuration specification types.
//!
//! This module defines the struct that maps to the reporter's YAML settings
//! file. Every key is optional at the parsing stage so that an empty file
//! parses cleanly; the validator decides what is actually mandatory.

use serde::{Deserialize, Serialize};

use crate::collector::WorkdirStrategy;

/// Sentinel value of `critical_resources` meaning "every resource type".
pub const ALL_RESOURCES: &str = "all";

/// The root settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Path (absolute, relative or bare name) of the `terraform` command.
    pub terraform_binary_file: String,
    /// Exact base name of the plan files to search for.
    pub terraform_plan_file_basename: String,
    /// Root folder of the plan file search.
    pub terraform_plan_search_folder: String,
    /// Resource types protected from removal, or `[all]`.
    pub critical_resources: Vec<String>,
    /// Resource types allowed to be removed when `critical_resources` is `[all]`.
    pub allowed_removals: Vec<String>,
    /// Pass the plan file path as-is instead of `-chdir=<dir>` + base name.
    pub not_use_chdir: bool,
}

impl Settings {
    /// Returns true if `critical_resources` contains the `all` sentinel.
    #[must_use]
    pub fn is_all_critical(&self) -> bool {
        self.critical_resources.iter().any(|item| is_all_sentinel(item))
    }

    /// Returns the converter working-directory strategy selected by `not_use_chdir`.
    #[must_use]
    pub const fn workdir_strategy(&self) -> WorkdirStrategy {
        if self.not_use_chdir {
            WorkdirStrategy::NoChdir
        } else {
            WorkdirStrategy::Chdir
        }
    }
}

/// Checks whether a list item is the `all` sentinel (trimmed, case-insensitive).
#[must_use]
pub fn is_all_sentinel(item: &str) -> bool {
    item.trim().eq_ignore_ascii_case(ALL_RESOURCES)
}
