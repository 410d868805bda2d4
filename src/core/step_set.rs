//! Ordered step declarations and active-step filtering.

use super::answers::Values;
use super::step::{Step, StepId};
use super::violations::StepSetViolation;
use std::collections::BTreeMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Ordered, immutable declaration of every step of a form.
///
/// Ids are expected to be unique; [`StepSet::validate`] reports violations
/// but the set itself never repairs them.
#[derive(Clone, Debug, Default)]
pub struct StepSet {
    steps: Vec<Step>,
}

impl StepSet {
    pub fn new<I>(steps: I) -> Self
    where
        I: IntoIterator<Item = Step>,
    {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Check the declaration and a starting history against it,
    /// accumulating every violation rather than stopping at the first.
    pub fn validate(&self, seed: &[StepId]) -> Validation<(), NonEmptyVec<StepSetViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<StepSetViolation>>> = Vec::new();

        if self.steps.is_empty() {
            checks.push(Validation::fail(StepSetViolation::Empty));
        }

        let mut counts: BTreeMap<&StepId, usize> = BTreeMap::new();
        for step in &self.steps {
            *counts.entry(step.id()).or_default() += 1;
        }
        for (id, count) in counts {
            let check = if count > 1 {
                Validation::fail(StepSetViolation::DuplicateId {
                    id: id.clone(),
                    count,
                })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        for id in seed {
            let check = if self.contains(id) {
                Validation::success(())
            } else {
                Validation::fail(StepSetViolation::UnknownSeedStep { id: id.clone() })
            };
            checks.push(check);
        }

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn get(&self, id: &StepId) -> Option<&Step> {
        self.steps.iter().find(|step| step.id() == id)
    }

    /// Position of `id` within the full declaration, ignoring activity.
    pub fn position(&self, id: &StepId) -> Option<usize> {
        self.steps.iter().position(|step| step.id() == id)
    }

    pub fn contains(&self, id: &StepId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> Vec<StepId> {
        self.steps.iter().map(|step| step.id().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn filter_active(&self, values: &Values) -> ActiveSteps {
        filter_active(&self.steps, values)
    }
}

/// Select the steps whose activation rule holds for `values`, in declared order.
///
/// # Example
///
/// ```rust
/// use stepflow::core::{filter_active, Step, StepId};
/// use serde_json::{json, Map};
///
/// let steps = vec![
///     Step::new("a"),
///     Step::when("b", |v| v.get("x") == Some(&json!("b"))),
///     Step::new("c"),
/// ];
///
/// let active = filter_active(&steps, &Map::new());
/// assert_eq!(active.as_slice(), &[StepId::new("a"), StepId::new("c")]);
/// ```
pub fn filter_active(steps: &[Step], values: &Values) -> ActiveSteps {
    ActiveSteps(
        steps
            .iter()
            .filter(|step| step.is_active(values))
            .map(|step| step.id().clone())
            .collect(),
    )
}

/// Ids of the currently active steps, in declared order.
///
/// Always recomputed wholesale; never edited in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveSteps(Vec<StepId>);

impl ActiveSteps {
    pub fn contains(&self, id: &StepId) -> bool {
        self.0.contains(id)
    }

    pub fn position(&self, id: &StepId) -> Option<usize> {
        self.0.iter().position(|active| active == id)
    }

    pub fn last(&self) -> Option<&StepId> {
        self.0.last()
    }

    /// Resolve the target of a forward move from `current`.
    ///
    /// An explicit `target` must itself be active. Without one, the step
    /// following `current` in this list is chosen; nothing resolves when
    /// `current` is inactive or already last.
    pub fn next_after(&self, current: &StepId, target: Option<&StepId>) -> Option<&StepId> {
        match target {
            Some(target) => self.0.iter().find(|active| *active == target),
            None => {
                let index = self.position(current)?;
                self.0.get(index + 1)
            }
        }
    }

    pub fn as_slice(&self) -> &[StepId] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<StepId>> for ActiveSteps {
    fn from(ids: Vec<StepId>) -> Self {
        Self(ids)
    }
}

impl From<ActiveSteps> for Vec<StepId> {
    fn from(active: ActiveSteps) -> Self {
        active.0
    }
}
