//! Decision engine for resource removals.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use crate::config::DefensePlan;

/// Judges deletions against a [`DefensePlan`].
///
/// One instance lives for one run. Every forbidden answer raises the
/// `critical_removals_found` flag, which is never lowered again.
#[derive(Debug)]
pub struct DecisionMaker {
    /// Policy in force.
    plan: DefensePlan,
    /// Set once a forbidden removal has been seen.
    critical_removals_found: AtomicBool,
}

impl DecisionMaker {
    /// Creates a decision maker for the given policy.
    #[must_use]
    pub const fn new(plan: DefensePlan) -> Self {
        Self {
            plan,
            critical_removals_found: AtomicBool::new(false),
        }
    }

    /// Returns true if removing a resource of `resource_type` is allowed.
    #[must_use]
    pub fn is_allowed_for_removal(&self, resource_type: &str) -> bool {
        let allowed = self.plan.permits_removal(resource_type);

        if allowed {
            debug!(resource_type, "Removal allowed");
        } else {
            warn!(resource_type, "Critical resource removal detected");
            self.critical_removals_found.store(true, Ordering::Relaxed);
        }

        allowed
    }

    /// Returns true if any forbidden removal has been seen.
    #[must_use]
    pub fn critical_removals_found(&self) -> bool {
        self.critical_removals_found.load(Ordering::Relaxed)
    }

    /// Policy in force.
    #[must_use]
    pub const fn plan(&self) -> &DefensePlan {
        &self.plan
    }
}
