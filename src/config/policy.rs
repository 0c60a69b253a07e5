//! Removal policy derived from settings.

use std::collections::HashSet;
use tracing::debug;

use super::spec::Settings;

/// The removal policy the decision engine enforces.
///
/// The meaning of `exceptions` depends on the mode: with `critical_all` it
/// holds the types that may be removed, otherwise the types that may not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefensePlan {
    /// True when `critical_resources` is `[all]`.
    pub critical_all: bool,
    /// Lower-cased resource types (allow-list or protect-list, see above).
    pub exceptions: HashSet<String>,
}

impl DefensePlan {
    /// Derives the policy from validated settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.is_all_critical() {
            Self::allow_list(settings.allowed_removals.as_slice())
        } else {
            Self::protect_list(settings.critical_resources.as_slice())
        }
    }

    /// Every type is critical except the given ones.
    #[must_use]
    pub fn allow_list<S: AsRef<str>>(allowed: &[S]) -> Self {
        let plan = Self {
            critical_all: true,
            exceptions: normalize_all(allowed),
        };
        debug!(allowed = plan.exceptions.len(), "Removal policy: everything is critical except allowed removals");
        plan
    }

    /// Only the given types are critical.
    #[must_use]
    pub fn protect_list<S: AsRef<str>>(critical: &[S]) -> Self {
        let plan = Self {
            critical_all: false,
            exceptions: normalize_all(critical),
        };
        debug!(critical = plan.exceptions.len(), "Removal policy: only listed resources are critical");
        plan
    }

    /// Returns true if the policy permits removing `resource_type`.
    ///
    /// Pure lookup; [`crate::analysis::DecisionMaker`] wraps it to record
    /// forbidden answers.
    #[must_use]
    pub fn permits_removal(&self, resource_type: &str) -> bool {
        let listed = self.exceptions.contains(&normalize_type(resource_type));
        if self.critical_all { listed } else { !listed }
    }

    /// Short human-readable description of the mode.
    #[must_use]
    pub const fn mode_label(&self) -> &'static str {
        if self.critical_all {
            "all resources critical, allow-list of removals"
        } else {
            "listed resources critical"
        }
    }
}

/// Normalizes a resource type for policy lookups.
#[must_use]
pub fn normalize_type(resource_type: &str) -> String {
    resource_type.trim().to_lowercase()
}

fn normalize_all<S: AsRef<str>>(items: &[S]) -> HashSet<String> {
    items
        .iter()
        .map(|item| normalize_type(item.as_ref()))
        .filter(|item| !item.is_empty())
        .collect()
}
