//! Classification of a resource's reported actions.

use serde::Serialize;
use std::fmt;

use crate::collector::Action;

/// Category a resource change is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    /// The resource will be created.
    Create,
    /// The resource will be updated in place.
    Update,
    /// The resource will be destroyed.
    Delete,
    /// The resource stays as is.
    NoOp,
}

impl ChangeAction {
    /// Matching order used when a resource reports several actions.
    pub const PRIORITY: [Self; 4] = [Self::Create, Self::Delete, Self::Update, Self::NoOp];

    /// Classifies an action set by the first category of [`Self::PRIORITY`]
    /// present in it.
    ///
    /// A replacement (`["delete", "create"]`) therefore counts as a creation.
    /// Returns `None` when no recognized action is present, e.g. `["read"]`.
    #[must_use]
    pub fn classify(actions: &[Action]) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|category| actions.contains(&category.raw()))
    }

    /// The plan action this category corresponds to.
    const fn raw(self) -> Action {
        match self {
            Self::Create => Action::Create,
            Self::Update => Action::Update,
            Self::Delete => Action::Delete,
            Self::NoOp => Action::NoOp,
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::NoOp => write!(f, "no-op"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_actions() {
        assert_eq!(ChangeAction::classify(&[Action::Create]), Some(ChangeAction::Create));
        assert_eq!(ChangeAction::classify(&[Action::Update]), Some(ChangeAction::Update));
        assert_eq!(ChangeAction::classify(&[Action::Delete]), Some(ChangeAction::Delete));
        assert_eq!(ChangeAction::classify(&[Action::NoOp]), Some(ChangeAction::NoOp));
    }

    #[test]
    fn test_replacement_is_a_creation_in_either_order() {
        assert_eq!(
            ChangeAction::classify(&[Action::Delete, Action::Create]),
            Some(ChangeAction::Create)
        );
        assert_eq!(
            ChangeAction::classify(&[Action::Create, Action::Delete]),
            Some(ChangeAction::Create)
        );
    }

    #[test]
    fn test_delete_wins_over_update() {
        assert_eq!(
            ChangeAction::classify(&[Action::Update, Action::Delete]),
            Some(ChangeAction::Delete)
        );
    }

    #[test]
    fn test_unrecognized_actions() {
        assert_eq!(ChangeAction::classify(&[Action::Read]), None);
        assert_eq!(ChangeAction::classify(&[Action::Other]), None);
        assert_eq!(ChangeAction::classify(&[]), None);
        assert_eq!(
            ChangeAction::classify(&[Action::Read, Action::Update]),
            Some(ChangeAction::Update)
        );
    }
}
