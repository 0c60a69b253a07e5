//! Plan collection.
//!
//! This module finds plan artifacts on disk, turns each of them into a
//! structured plan through the external converter and fans the results in
//! under a concurrency bound.

mod coordinator;
mod extractor;
mod locator;
mod plan;

#[cfg(all(test, unix))]
pub(crate) mod test_support;

pub use coordinator::{PlanCollector, default_parallelism};
pub use extractor::{PlanExtractor, TerraformShow, WorkdirStrategy, is_executable, resolve_binary};
pub use locator::locate;
pub use plan::{Action, Change, ResourceChange, TerraformPlan};
