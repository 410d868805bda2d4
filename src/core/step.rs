//! Step declarations and activation rules.
//!
//! A step is an immutable pair of an id and an activation rule. Rules are
//! pure predicates over a values snapshot supplied by the caller; they never
//! capture ambient form state.

use super::answers::Values;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Opaque identifier of a step, unique within a [`StepSet`](super::StepSet).
///
/// # Example
///
/// ```rust
/// use stepflow::core::StepId;
///
/// let id = StepId::new("contact");
/// assert_eq!(id.as_str(), "contact");
/// assert_eq!(id, "contact");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StepId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&StepId> for StepId {
    fn from(id: &StepId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StepId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StepId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StepId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Predicate deciding whether a step is active for a values snapshot.
pub type ActivationPredicate = Arc<dyn Fn(&Values) -> bool + Send + Sync>;

/// Rule deciding whether a step can currently be visited.
///
/// Predicates must be pure: deterministic and free of side effects. A
/// panicking predicate is a caller bug and is not recovered from.
#[derive(Clone, Default)]
pub enum ActivationRule {
    #[default]
    Always,
    Never,
    Predicate(ActivationPredicate),
}

impl ActivationRule {
    /// Build a predicate rule from a closure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stepflow::core::ActivationRule;
    /// use serde_json::{json, Map};
    ///
    /// let rule = ActivationRule::when(|values| values.get("plan") == Some(&json!("pro")));
    ///
    /// let mut values = Map::new();
    /// assert!(!rule.evaluate(&values));
    /// values.insert("plan".into(), json!("pro"));
    /// assert!(rule.evaluate(&values));
    /// ```
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&Values) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    pub fn evaluate(&self, values: &Values) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Predicate(predicate) => predicate(values),
        }
    }
}

impl From<bool> for ActivationRule {
    fn from(active: bool) -> Self {
        if active {
            Self::Always
        } else {
            Self::Never
        }
    }
}

impl fmt::Debug for ActivationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::Never => f.write_str("Never"),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A single declared step of a form flow.
#[derive(Clone, Debug)]
pub struct Step {
    id: StepId,
    activation: ActivationRule,
}

impl Step {
    /// Declare a step that is always active.
    pub fn new(id: impl Into<StepId>) -> Self {
        Self {
            id: id.into(),
            activation: ActivationRule::Always,
        }
    }

    /// Declare a step that is active only while `predicate` holds.
    pub fn when<F>(id: impl Into<StepId>, predicate: F) -> Self
    where
        F: Fn(&Values) -> bool + Send + Sync + 'static,
    {
        Self::new(id).with_activation(ActivationRule::when(predicate))
    }

    pub fn with_activation(mut self, rule: impl Into<ActivationRule>) -> Self {
        self.activation = rule.into();
        self
    }

    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn activation(&self) -> &ActivationRule {
        &self.activation
    }

    pub fn is_active(&self, values: &Values) -> bool {
        self.activation.evaluate(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(raw: serde_json::Value) -> Values {
        raw.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn step_without_rule_is_always_active() {
        let step = Step::new("intro");
        assert!(step.is_active(&Values::new()));
        assert!(matches!(step.activation(), ActivationRule::Always));
    }

    #[test]
    fn never_rule_is_never_active() {
        let step = Step::new("legacy").with_activation(false);
        assert!(!step.is_active(&values(json!({ "anything": true }))));
    }

    #[test]
    fn predicate_sees_the_supplied_snapshot() {
        let step = Step::when("pets", |v| v.get("has_pets") == Some(&json!(true)));

        assert!(!step.is_active(&values(json!({}))));
        assert!(!step.is_active(&values(json!({ "has_pets": false }))));
        assert!(step.is_active(&values(json!({ "has_pets": true }))));
    }

    #[test]
    fn step_id_compares_with_str() {
        let id = StepId::from("a");
        assert_eq!(id, "a");
        assert_eq!(id.to_string(), "a");
        assert_ne!(id, StepId::new("b"));
    }

    #[test]
    fn step_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&StepId::new("details")).unwrap();
        assert_eq!(json, "\"details\"");
        let back: StepId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, "details");
    }

    #[test]
    fn rule_debug_hides_closure() {
        let rule = ActivationRule::when(|_| true);
        assert_eq!(format!("{rule:?}"), "Predicate(..)");
    }
}
