//! Field ownership and history-scoped answer projection.

use super::step::StepId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Raw form values keyed by field name.
pub type Values = Map<String, Value>;

/// Mapping from field name to the step that registered it.
///
/// The map only grows: fields are never unregistered, even when their step
/// later becomes inactive. Registering a field again moves it to the new step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldOwnership {
    fields: BTreeMap<String, StepId>,
}

impl FieldOwnership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` belongs to `step`, returning the previous owner.
    pub fn register_field(
        &mut self,
        name: impl Into<String>,
        step: impl Into<StepId>,
    ) -> Option<StepId> {
        self.fields.insert(name.into(), step.into())
    }

    pub fn owner(&self, name: &str) -> Option<&StepId> {
        self.fields.get(name)
    }

    /// Fields registered by `step`, or every registered field when `step` is `None`.
    pub fn fields_for_step(&self, step: Option<&StepId>) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(_, owner)| step.map_or(true, |step| *owner == step))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StepId)> {
        self.fields.iter().map(|(name, step)| (name.as_str(), step))
    }
}

/// Restrict `values` to the fields whose owning step appears in `history`.
///
/// Fields that were never registered are dropped, as are fields owned by
/// branches abandoned through backtracking.
///
/// # Example
///
/// ```rust
/// use stepflow::core::{project, FieldOwnership, StepId};
/// use serde_json::json;
///
/// let mut ownership = FieldOwnership::new();
/// ownership.register_field("name", "intro");
/// ownership.register_field("pet", "pets");
///
/// let values = json!({ "name": "Ada", "pet": "cat", "stray": 1 });
/// let history = vec![StepId::new("intro"), StepId::new("done")];
///
/// let answers = project(values.as_object().unwrap(), &history, &ownership);
/// assert_eq!(answers.len(), 1);
/// assert_eq!(answers["name"], json!("Ada"));
/// ```
pub fn project(values: &Values, history: &[StepId], ownership: &FieldOwnership) -> Values {
    let walked: HashSet<&StepId> = history.iter().collect();

    values
        .iter()
        .filter(|(name, _)| {
            ownership
                .owner(name)
                .is_some_and(|owner| walked.contains(owner))
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
