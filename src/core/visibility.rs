//! Show/hide rules for navigation controls.

use super::step::StepId;
use serde::{Deserialize, Serialize};

/// Index sentinel meaning "the last active step".
pub const LAST_STEP: i64 = -1;

/// The step currently displayed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStep {
    pub id: StepId,
    /// Position within the full step declaration, not the active subset.
    pub index: Option<usize>,
}

/// Condition under which a navigation control is shown or hidden.
///
/// - `Flag`: fixed visibility.
/// - `Step`: matches a single step id.
/// - `Index`: matches a position in the full declaration, with
///   [`LAST_STEP`] matching whichever step is last among the active ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ButtonVisibility {
    Flag(bool),
    Index(i64),
    Step(StepId),
}

impl From<bool> for ButtonVisibility {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<i64> for ButtonVisibility {
    fn from(index: i64) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ButtonVisibility {
    fn from(id: &str) -> Self {
        Self::Step(StepId::new(id))
    }
}

/// Decide whether a control is visible on `current`.
///
/// Rules are checked in a fixed order: boolean `show`, boolean `hide`,
/// step-id `show`, step-id `hide`, then index `show` and index `hide`.
/// Without any applicable rule the control is visible.
///
/// # Example
///
/// ```rust
/// use stepflow::core::{is_visible, ButtonVisibility, CurrentStep, StepId, LAST_STEP};
///
/// let current = CurrentStep { id: StepId::new("review"), index: Some(4) };
/// let last = ButtonVisibility::Index(LAST_STEP);
///
/// assert!(is_visible(Some(&last), None, &current, true));
/// assert!(!is_visible(Some(&last), None, &current, false));
/// ```
pub fn is_visible(
    show: Option<&ButtonVisibility>,
    hide: Option<&ButtonVisibility>,
    current: &CurrentStep,
    is_last_step: bool,
) -> bool {
    if let Some(ButtonVisibility::Flag(show)) = show {
        return *show;
    }
    if let Some(ButtonVisibility::Flag(hide)) = hide {
        return !*hide;
    }

    if let Some(ButtonVisibility::Step(id)) = show {
        return current.id == *id;
    }
    if let Some(ButtonVisibility::Step(id)) = hide {
        return current.id != *id;
    }

    let target = if is_last_step {
        Some(LAST_STEP)
    } else {
        current.index.and_then(|index| i64::try_from(index).ok())
    };

    if let Some(ButtonVisibility::Index(index)) = show {
        return target == Some(*index);
    }
    if let Some(ButtonVisibility::Index(index)) = hide {
        return target != Some(*index);
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: &str, index: usize) -> CurrentStep {
        CurrentStep {
            id: StepId::new(id),
            index: Some(index),
        }
    }

    #[test]
    fn visible_without_rules() {
        assert!(is_visible(None, None, &at("a", 0), false));
    }

    #[test]
    fn boolean_show_wins_over_everything() {
        let show = ButtonVisibility::Flag(false);
        let hide = ButtonVisibility::Flag(false);
        assert!(!is_visible(Some(&show), Some(&hide), &at("a", 0), false));
    }

    #[test]
    fn boolean_hide_inverts() {
        let hide = ButtonVisibility::Flag(true);
        assert!(!is_visible(None, Some(&hide), &at("a", 0), false));
    }

    #[test]
    fn step_id_rules_match_current_step() {
        let rule = ButtonVisibility::from("b");
        assert!(is_visible(Some(&rule), None, &at("b", 1), false));
        assert!(!is_visible(Some(&rule), None, &at("a", 0), false));
        assert!(!is_visible(None, Some(&rule), &at("b", 1), false));
        assert!(is_visible(None, Some(&rule), &at("a", 0), false));
    }

    #[test]
    fn index_rules_use_full_declaration_position() {
        let rule = ButtonVisibility::Index(2);
        assert!(is_visible(Some(&rule), None, &at("c", 2), false));
        assert!(!is_visible(Some(&rule), None, &at("b", 1), false));
    }

    #[test]
    fn last_step_sentinel_replaces_index() {
        let last = ButtonVisibility::Index(LAST_STEP);
        let third = ButtonVisibility::Index(2);

        assert!(is_visible(Some(&last), None, &at("c", 2), true));
        // On the last step the ordinary index no longer matches.
        assert!(!is_visible(Some(&third), None, &at("c", 2), true));
        assert!(!is_visible(None, Some(&last), &at("c", 2), true));
        assert!(is_visible(None, Some(&last), &at("b", 1), false));
    }

    #[test]
    fn undeclared_current_step_matches_no_index() {
        let current = CurrentStep {
            id: StepId::new("ghost"),
            index: None,
        };
        let first = ButtonVisibility::Index(0);
        assert!(!is_visible(Some(&first), None, &current, false));
        assert!(is_visible(None, Some(&first), &current, false));
    }

    #[test]
    fn visibility_deserializes_untagged() {
        let flag: ButtonVisibility = serde_json::from_str("true").unwrap();
        let index: ButtonVisibility = serde_json::from_str("-1").unwrap();
        let step: ButtonVisibility = serde_json::from_str("\"review\"").unwrap();

        assert_eq!(flag, ButtonVisibility::Flag(true));
        assert_eq!(index, ButtonVisibility::Index(LAST_STEP));
        assert_eq!(step, ButtonVisibility::from("review"));
    }
}
