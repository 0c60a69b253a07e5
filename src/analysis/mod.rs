//! Analysis of collected plans.
//!
//! This module provides:
//! - Classification of reported actions into change categories
//! - Consolidation of every plan into one categorized result
//! - The decision engine judging resource removals

mod action;
mod consolidated;
mod decision;

pub use action::ChangeAction;
pub use consolidated::{ConsolidatedResult, ResourceChangeRecord, normalize_index};
pub use decision::DecisionMaker;
