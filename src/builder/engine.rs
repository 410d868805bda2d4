//! Builder for constructing navigation engines.

use crate::builder::error::BuildError;
use crate::checkpoint::Checkpoint;
use crate::core::{
    AnimationConfig, CurrentStep, Direction, HistoryLedger, NavState, Step, StepId, StepSet,
    StepSetViolation, Values,
};
use crate::effects::{
    CheckError, EngineParts, Hooks, Interceptor, NavigationEngine, NavigationRequest, StepsForm,
    SubmitResult, Verdict,
};
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use stillwater::validation::Validation;
use tracing::debug;

/// Builder for constructing navigation engines with a fluent API.
///
/// # Example
///
/// ```rust
/// use stepflow::builder::EngineBuilder;
/// use stepflow::effects::FormState;
/// use stepflow::steps;
/// use serde_json::Map;
///
/// let engine = EngineBuilder::new()
///     .steps(steps!["intro", "plan", "review"])
///     .form(FormState::new(Map::new()))
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.current_step().id, "intro");
/// ```
pub struct EngineBuilder<F: StepsForm> {
    steps: Vec<Step>,
    default_step: Option<StepId>,
    default_history: Vec<StepId>,
    resume: Option<Checkpoint>,
    animation: AnimationConfig,
    disabled: bool,
    form: Option<Arc<F>>,
    hooks: Hooks,
}

impl<F: StepsForm> EngineBuilder<F> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            default_step: None,
            default_history: Vec::new(),
            resume: None,
            animation: AnimationConfig::default(),
            disabled: false,
            form: None,
            hooks: Hooks::default(),
        }
    }

    /// Append a step to the declaration.
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Append several steps at once.
    pub fn steps<I>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = Step>,
    {
        self.steps.extend(steps);
        self
    }

    /// Start at `id` instead of the first declared step.
    pub fn default_step(mut self, id: impl Into<StepId>) -> Self {
        self.default_step = Some(id.into());
        self
    }

    /// Start with a pre-walked history. Takes precedence over
    /// [`EngineBuilder::default_step`].
    pub fn default_history<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StepId>,
    {
        self.default_history = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Continue from a checkpoint. Reset still returns to the configured
    /// starting history.
    pub fn resume(mut self, checkpoint: Checkpoint) -> Self {
        self.resume = Some(checkpoint);
        self
    }

    pub fn animate(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the form store (required).
    pub fn form(self, form: F) -> Self {
        self.shared_form(Arc::new(form))
    }

    /// Set a form store that the host keeps a handle to.
    pub fn shared_form(mut self, form: Arc<F>) -> Self {
        self.form = Some(form);
        self
    }

    /// Check run after form validation on every forward move.
    ///
    /// The check may return anything convertible into a [`Verdict`]: `bool`,
    /// `()` or `Option<bool>`.
    pub fn on_forward<I, Fut, V>(mut self, interceptor: I) -> Self
    where
        I: Fn(NavigationRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, CheckError>> + Send + 'static,
        V: Into<Verdict> + Send + 'static,
    {
        self.hooks.on_forward = Some(intercept(interceptor));
        self
    }

    /// Check run on every backward move. Form validation is skipped
    /// when going back.
    pub fn on_backward<I, Fut, V>(mut self, interceptor: I) -> Self
    where
        I: Fn(NavigationRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, CheckError>> + Send + 'static,
        V: Into<Verdict> + Send + 'static,
    {
        self.hooks.on_backward = Some(intercept(interceptor));
        self
    }

    /// Called with the step just entered after each committed move.
    pub fn on_step_enter<H>(mut self, hook: H) -> Self
    where
        H: Fn(&CurrentStep, &Values) + Send + Sync + 'static,
    {
        self.hooks.on_step_enter = Some(Arc::new(hook));
        self
    }

    /// Called with the step just left after each committed move.
    pub fn on_step_exit<H>(mut self, hook: H) -> Self
    where
        H: Fn(&CurrentStep, &Values) + Send + Sync + 'static,
    {
        self.hooks.on_step_exit = Some(Arc::new(hook));
        self
    }

    pub fn on_submit<H, Fut>(mut self, handler: H) -> Self
    where
        H: Fn(SubmitResult) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.hooks.on_submit = Some(Arc::new(move |result| handler(result).boxed()));
        self
    }

    /// Build the engine.
    /// Returns an error if the form is missing or the declaration is invalid.
    pub fn build(self) -> Result<NavigationEngine<F>, BuildError> {
        let form = self.form.ok_or(BuildError::MissingForm)?;
        let steps = StepSet::new(self.steps);

        let seed = if !self.default_history.is_empty() {
            self.default_history
        } else if let Some(id) = self.default_step {
            vec![id]
        } else {
            steps.first().map(|step| step.id().clone()).into_iter().collect()
        };

        let mut referenced = seed.clone();
        if let Some(checkpoint) = &self.resume {
            referenced.extend(checkpoint.history.iter().cloned());
        }
        if let Validation::Failure(violations) = steps.validate(&referenced) {
            return Err(BuildError::InvalidSteps(
                violations.iter().cloned().collect(),
            ));
        }

        let (history, direction) = match self.resume {
            Some(checkpoint) => (checkpoint.history, checkpoint.direction),
            // A seed is only empty when no step is declared, which validation rejects.
            None => match HistoryLedger::seeded(seed.iter().cloned()) {
                Some(history) => (history, Direction::Forward),
                None => return Err(BuildError::InvalidSteps(vec![StepSetViolation::Empty])),
            },
        };

        let active = steps.filter_active(&form.values());
        debug!(
            steps = steps.len(),
            history = ?history.as_slice(),
            animated = self.animation.is_animated(),
            "navigation engine built"
        );

        Ok(NavigationEngine::from_parts(EngineParts {
            initial: NavState::new(history, active).with_direction(direction),
            steps,
            seed,
            animation: self.animation,
            form,
            hooks: self.hooks,
            disabled: self.disabled,
        }))
    }
}

impl<F: StepsForm> Default for EngineBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}

fn intercept<I, Fut, V>(interceptor: I) -> Interceptor
where
    I: Fn(NavigationRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, CheckError>> + Send + 'static,
    V: Into<Verdict> + Send + 'static,
{
    Arc::new(move |request| {
        let check = interceptor(request);
        async move { check.await.map(Into::into) }.boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnimationMode, NavigationStatus};
    use crate::effects::FormState;
    use serde_json::Map;

    fn three_steps() -> Vec<Step> {
        vec![Step::new("a"), Step::new("b"), Step::new("c")]
    }

    fn form() -> FormState {
        FormState::new(Map::new())
    }

    #[test]
    fn builder_requires_form() {
        let result = EngineBuilder::<FormState>::new().steps(three_steps()).build();
        assert!(matches!(result, Err(BuildError::MissingForm)));
    }

    #[test]
    fn builder_rejects_empty_declaration() {
        let result = EngineBuilder::new().form(form()).build();
        match result {
            Err(err) => assert_eq!(err.violations(), &[StepSetViolation::Empty]),
            Ok(_) => panic!("empty declaration should not build"),
        }
    }

    #[test]
    fn builder_accumulates_violations() {
        let result = EngineBuilder::new()
            .steps(vec![Step::new("a"), Step::new("a")])
            .default_history(["a", "ghost"])
            .form(form())
            .build();

        match result {
            Err(err) => assert_eq!(err.violations().len(), 2),
            Ok(_) => panic!("invalid declaration should not build"),
        }
    }

    #[test]
    fn starts_at_first_step_by_default() {
        let engine = EngineBuilder::new()
            .steps(three_steps())
            .form(form())
            .build()
            .unwrap();

        let state = engine.state();
        assert_eq!(state.history, vec![StepId::new("a")]);
        assert_eq!(state.current_step.index, Some(0));
        assert!(state.is_first_step);
        assert_eq!(state.status, NavigationStatus::Idle);
    }

    #[test]
    fn default_history_wins_over_default_step() {
        let engine = EngineBuilder::new()
            .steps(three_steps())
            .default_step("c")
            .default_history(["a", "b"])
            .form(form())
            .build()
            .unwrap();

        assert_eq!(engine.current_step().id, "b");
        assert_eq!(engine.seed(), &[StepId::new("a"), StepId::new("b")]);
    }

    #[test]
    fn default_step_seeds_history() {
        let engine = EngineBuilder::new()
            .steps(three_steps())
            .default_step("b")
            .form(form())
            .build()
            .unwrap();

        assert_eq!(engine.history().as_slice(), &[StepId::new("b")]);
    }

    #[test]
    fn resume_restores_checkpoint() {
        let history = HistoryLedger::seeded(["a", "c"].map(StepId::new)).unwrap();
        let checkpoint = Checkpoint::capture(&history, Direction::Backward);

        let engine = EngineBuilder::new()
            .steps(three_steps())
            .resume(checkpoint)
            .form(form())
            .build()
            .unwrap();

        let state = engine.state();
        assert_eq!(state.current_step.id, "c");
        assert_eq!(state.direction, Direction::Backward);
        assert_eq!(engine.seed(), &[StepId::new("a")]);
    }

    #[test]
    fn resume_rejects_unknown_steps() {
        let history = HistoryLedger::seeded(["a", "gone"].map(StepId::new)).unwrap();
        let result = EngineBuilder::new()
            .steps(three_steps())
            .resume(Checkpoint::capture(&history, Direction::Forward))
            .form(form())
            .build();

        assert!(matches!(result, Err(BuildError::InvalidSteps(_))));
    }

    #[test]
    fn animation_and_disabled_flags_reach_state() {
        let engine = EngineBuilder::new()
            .steps(three_steps())
            .animate(AnimationConfig::disabled())
            .disabled(true)
            .form(form())
            .build()
            .unwrap();

        let state = engine.state();
        assert!(!state.is_animated);
        assert!(state.is_disabled);
        assert_eq!(engine.animation().mode, AnimationMode::None);
    }
}
