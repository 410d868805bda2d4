//! Navigation engine that runs gated, animated step transitions.

use crate::checkpoint::Checkpoint;
use crate::core::{
    is_visible, project, reduce, AnimationConfig, ButtonVisibility, CurrentStep, Direction,
    HistoryLedger, NavEvent, NavState, NavigationStatus, StepId, StepSet, Values,
};
use crate::effects::form::StepsForm;
use crate::effects::gate::{CheckResult, GateCheck, TransitionGate, Verdict};
use crate::effects::timer::TransitionTimer;
use futures::future::BoxFuture;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Caller-supplied check that may veto a forward or backward transition.
pub type Interceptor =
    Arc<dyn Fn(NavigationRequest) -> BoxFuture<'static, CheckResult> + Send + Sync>;

/// Callback fired when a step is left or entered.
pub type StepHook = Arc<dyn Fn(&CurrentStep, &Values) + Send + Sync>;

/// Callback receiving the result of a successful submission.
pub type SubmitHandler = Arc<dyn Fn(SubmitResult) -> BoxFuture<'static, ()> + Send + Sync>;

/// Read-only view of the engine, as exposed to the UI layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepsState {
    pub current_step: CurrentStep,
    pub all_steps: Vec<StepId>,
    pub active_steps: Vec<StepId>,
    pub history: Vec<StepId>,
    pub direction: Direction,
    pub status: NavigationStatus,
    pub is_first_step: bool,
    pub is_last_step: bool,
    pub is_animated: bool,
    pub is_disabled: bool,
    pub is_transitioning: bool,
    pub is_validating: bool,
}

impl StepsState {
    /// Apply show/hide rules of a navigation control to this state.
    pub fn is_visible(
        &self,
        show: Option<&ButtonVisibility>,
        hide: Option<&ButtonVisibility>,
    ) -> bool {
        is_visible(show, hide, &self.current_step, self.is_last_step)
    }
}

/// What an interceptor is asked to approve.
#[derive(Clone, Debug)]
pub struct NavigationRequest {
    /// Explicit target of the move, if the caller named one.
    pub target: Option<StepId>,
    /// State at the time the move was requested.
    pub state: StepsState,
    /// Form values at the time the move was requested.
    pub values: Values,
}

/// Payload handed to the submit handler.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmitResult {
    /// Values owned by steps on the walked path.
    pub answers: Values,
    /// Every raw form value.
    pub values: Values,
    pub state: StepsState,
}

/// Result of a navigation request. Navigation never fails loudly; this only
/// tells the caller what happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The move was committed and `to` is now the current step.
    ///
    /// A forward jump to a step that is already in the history leaves the
    /// history untouched; `from` and `to` are then the same step.
    Moved { from: StepId, to: StepId },
    /// The engine was busy or disabled, or there was nowhere to go back to.
    Ignored,
    /// A check blocked the move, failed or panicked.
    Blocked,
    /// No valid target step could be resolved.
    Unresolved,
    /// A reset happened while checks were running.
    Superseded,
}

impl NavigationOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) on_forward: Option<Interceptor>,
    pub(crate) on_backward: Option<Interceptor>,
    pub(crate) on_step_enter: Option<StepHook>,
    pub(crate) on_step_exit: Option<StepHook>,
    pub(crate) on_submit: Option<SubmitHandler>,
}

/// Everything the builder hands over to a new engine.
pub(crate) struct EngineParts<F> {
    pub(crate) steps: StepSet,
    pub(crate) seed: Vec<StepId>,
    pub(crate) initial: NavState,
    pub(crate) animation: AnimationConfig,
    pub(crate) form: Arc<F>,
    pub(crate) hooks: Hooks,
    pub(crate) disabled: bool,
}

#[derive(Debug)]
struct Shared {
    nav: Mutex<NavState>,
    timer: Mutex<TransitionTimer>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, NavState> {
        self.nav.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn timer(&self) -> MutexGuard<'_, TransitionTimer> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, event: NavEvent) -> NavState {
        let mut nav = self.lock();
        *nav = reduce(&nav, event);
        nav.clone()
    }
}

type Commit = Result<(StepId, NavState), NavigationOutcome>;

/// Multi-step form navigation engine.
///
/// Navigation methods take `&self` and may be called concurrently from any
/// event handler: while a transition is validating or animating, further
/// requests are ignored. Animation timers require a tokio runtime.
pub struct NavigationEngine<F: StepsForm> {
    steps: Arc<StepSet>,
    seed: Vec<StepId>,
    animation: AnimationConfig,
    form: Arc<F>,
    hooks: Hooks,
    disabled: AtomicBool,
    shared: Arc<Shared>,
}

impl<F: StepsForm> NavigationEngine<F> {
    pub(crate) fn from_parts(parts: EngineParts<F>) -> Self {
        Self {
            steps: Arc::new(parts.steps),
            seed: parts.seed,
            animation: parts.animation,
            form: parts.form,
            hooks: parts.hooks,
            disabled: AtomicBool::new(parts.disabled),
            shared: Arc::new(Shared {
                nav: Mutex::new(parts.initial),
                timer: Mutex::new(TransitionTimer::default()),
            }),
        }
    }

    pub fn steps(&self) -> &StepSet {
        &self.steps
    }

    pub fn form(&self) -> &Arc<F> {
        &self.form
    }

    pub fn animation(&self) -> AnimationConfig {
        self.animation
    }

    /// The history a reset returns to.
    pub fn seed(&self) -> &[StepId] {
        &self.seed
    }

    /// Disable or re-enable navigation from outside the engine.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    pub fn status(&self) -> NavigationStatus {
        self.shared.lock().status
    }

    pub fn history(&self) -> HistoryLedger {
        self.shared.lock().history.clone()
    }

    pub fn current_step(&self) -> CurrentStep {
        self.current_of(&self.shared.lock())
    }

    pub fn state(&self) -> StepsState {
        self.project(&self.shared.lock())
    }

    /// Validate the form and move to the next active step.
    pub async fn next(&self) -> NavigationOutcome {
        self.forward(None).await
    }

    /// Validate the form and jump forward to `target`, which must be active.
    pub async fn next_to(&self, target: impl Into<StepId>) -> NavigationOutcome {
        self.forward(Some(target.into())).await
    }

    /// Return to the previously visited step.
    pub async fn prev(&self) -> NavigationOutcome {
        self.backward(None).await
    }

    /// Return to `target`, which must already be in the history.
    pub async fn prev_to(&self, target: impl Into<StepId>) -> NavigationOutcome {
        self.backward(Some(target.into())).await
    }

    /// Restore the starting history and the form's default values.
    ///
    /// Unconditional: no checks run and a pending transition is abandoned.
    pub async fn reset(&self) {
        let defaults = self.form.default_values();
        let active = self.steps.filter_active(&defaults);

        let history = {
            let mut nav = self.shared.lock();
            self.shared.timer().cancel();
            *nav = reduce(
                &nav,
                NavEvent::Reset {
                    seed: self.seed.clone(),
                    active,
                },
            );
            nav.history.clone()
        };
        self.form.reset(&defaults);

        debug!(history = ?history.as_slice(), "navigation reset");
    }

    /// Form values restricted to the steps on the walked path.
    pub fn answers(&self) -> Values {
        let history = self.history();
        project(
            &self.form.values(),
            history.as_slice(),
            &self.form.ownership(),
        )
    }

    /// Validate the form and hand `{answers, values, state}` to the submit
    /// handler. Returns `None` when validation fails.
    pub async fn submit(&self) -> Option<SubmitResult> {
        if !self.form.validate().await {
            debug!("submission rejected by form validation");
            return None;
        }

        let result = SubmitResult {
            answers: self.answers(),
            values: self.form.values(),
            state: self.state(),
        };

        if let Some(on_submit) = &self.hooks.on_submit {
            on_submit(result.clone()).await;
        }
        Some(result)
    }

    /// Snapshot of the navigation progress.
    pub fn checkpoint(&self) -> Checkpoint {
        let nav = self.shared.lock();
        Checkpoint::capture(&nav.history, nav.direction)
    }

    async fn forward(&self, target: Option<StepId>) -> NavigationOutcome {
        let snapshot = self.form.values();
        let (generation, request) = {
            let mut nav = self.shared.lock();
            if self.is_blocked(&nav) {
                debug!(requested = ?target, status = ?nav.status, "forward navigation ignored");
                return NavigationOutcome::Ignored;
            }
            let request = NavigationRequest {
                target: target.clone(),
                state: self.project(&nav),
                values: snapshot,
            };
            *nav = reduce(&nav, NavEvent::BeginChecks);
            (nav.generation, request)
        };

        let form = &*self.form;
        let mut checks = vec![GateCheck::new("validate", move || async move {
            Ok(Verdict::from(form.validate().await))
        })];
        if let Some(on_forward) = &self.hooks.on_forward {
            let on_forward = Arc::clone(on_forward);
            checks.push(GateCheck::new("on_forward", move || on_forward(request)));
        }

        if !TransitionGate::run(checks).await {
            self.settle(generation);
            return NavigationOutcome::Blocked;
        }

        let values = self.form.values();
        let active = self.steps.filter_active(&values);

        let commit: Commit = {
            let mut nav = self.shared.lock();
            if !is_validating(&nav, generation) {
                return NavigationOutcome::Superseded;
            }

            let from = nav.history.current().clone();
            let next = active.next_after(&from, target.as_ref()).cloned();
            match next {
                Some(to) => {
                    *nav = reduce(
                        &nav,
                        NavEvent::Advance {
                            target: to,
                            active,
                            animated: self.animation.is_animated(),
                        },
                    );
                    self.arm_timer(&mut nav);
                    Ok((from, nav.clone()))
                }
                None => {
                    debug!(from = %from, requested = ?target, "no active step to move forward to");
                    *nav = reduce(&nav, NavEvent::Settle);
                    Err(NavigationOutcome::Unresolved)
                }
            }
        };

        self.finish(commit, &values)
    }

    async fn backward(&self, target: Option<StepId>) -> NavigationOutcome {
        let snapshot = self.form.values();
        let (generation, on_backward, request) = {
            let mut nav = self.shared.lock();
            if self.is_blocked(&nav) || nav.history.len() <= 1 {
                debug!(requested = ?target, status = ?nav.status, "backward navigation ignored");
                return NavigationOutcome::Ignored;
            }

            let Some(on_backward) = self.hooks.on_backward.clone() else {
                let commit = self.commit_backward(&mut nav, target.as_ref());
                drop(nav);
                return self.finish(commit, &snapshot);
            };

            let request = NavigationRequest {
                target: target.clone(),
                state: self.project(&nav),
                values: snapshot,
            };
            *nav = reduce(&nav, NavEvent::BeginChecks);
            (nav.generation, on_backward, request)
        };

        let check = GateCheck::new("on_backward", move || on_backward(request));
        if !TransitionGate::run(vec![check]).await {
            self.settle(generation);
            return NavigationOutcome::Blocked;
        }

        let values = self.form.values();
        let commit = {
            let mut nav = self.shared.lock();
            if !is_validating(&nav, generation) {
                return NavigationOutcome::Superseded;
            }
            self.commit_backward(&mut nav, target.as_ref())
        };
        self.finish(commit, &values)
    }

    /// Resolve the backward target and apply it to `nav`.
    ///
    /// Must be called with the state lock held.
    fn commit_backward(&self, nav: &mut NavState, target: Option<&StepId>) -> Commit {
        let from = nav.history.current().clone();
        let resolved = match target {
            Some(target) => nav.history.contains(target).then(|| target.clone()),
            None => nav.history.previous().cloned(),
        };

        let Some(to) = resolved else {
            debug!(from = %from, requested = ?target, "no visited step to move back to");
            *nav = reduce(nav, NavEvent::Settle);
            return Err(NavigationOutcome::Unresolved);
        };

        *nav = reduce(
            nav,
            NavEvent::Retreat {
                target: to,
                animated: self.animation.is_animated(),
            },
        );
        self.arm_timer(nav);
        Ok((from, nav.clone()))
    }

    fn finish(&self, commit: Commit, values: &Values) -> NavigationOutcome {
        let (from, committed) = match commit {
            Ok(commit) => commit,
            Err(outcome) => return outcome,
        };

        let entered = self.current_of(&committed);
        debug!(
            from = %from,
            to = %entered.id,
            direction = ?committed.direction,
            "transition committed"
        );

        if entered.id != from {
            let exited = CurrentStep {
                index: self.steps.position(&from),
                id: from.clone(),
            };
            if let Some(on_step_exit) = &self.hooks.on_step_exit {
                on_step_exit(&exited, values);
            }
            if let Some(on_step_enter) = &self.hooks.on_step_enter {
                on_step_enter(&entered, values);
            }
        }

        NavigationOutcome::Moved {
            from,
            to: entered.id,
        }
    }

    /// Start the timer that ends the transition just committed to `nav`.
    ///
    /// Called with the state lock held, so the timer always belongs to the
    /// latest committed generation.
    fn arm_timer(&self, nav: &mut NavState) {
        if nav.status != NavigationStatus::Transitioning {
            return;
        }

        let generation = nav.generation;
        let shared = Arc::downgrade(&self.shared);
        let scheduled = self
            .shared
            .timer()
            .schedule(self.animation.duration(), async move {
                if let Some(shared) = shared.upgrade() {
                    shared.dispatch(NavEvent::TransitionElapsed { generation });
                }
            });

        if !scheduled {
            warn!("no tokio runtime available, ending transition immediately");
            *nav = reduce(nav, NavEvent::TransitionElapsed { generation });
        }
    }

    /// Return to idle after failed checks, unless a reset already did.
    fn settle(&self, generation: u64) {
        let mut nav = self.shared.lock();
        if is_validating(&nav, generation) {
            *nav = reduce(&nav, NavEvent::Settle);
        }
    }

    fn is_blocked(&self, nav: &NavState) -> bool {
        !nav.is_idle() || self.disabled.load(Ordering::SeqCst)
    }

    fn current_of(&self, nav: &NavState) -> CurrentStep {
        let id = nav.history.current().clone();
        CurrentStep {
            index: self.steps.position(&id),
            id,
        }
    }

    fn project(&self, nav: &NavState) -> StepsState {
        let current_step = self.current_of(nav);
        StepsState {
            is_first_step: current_step.id == *nav.history.first(),
            is_last_step: nav.active.last() == Some(&current_step.id),
            is_animated: self.animation.is_animated(),
            is_disabled: self.is_blocked(nav),
            is_transitioning: nav.status == NavigationStatus::Transitioning,
            is_validating: nav.status == NavigationStatus::Validating,
            all_steps: self.steps.ids(),
            active_steps: nav.active.as_slice().to_vec(),
            history: nav.history.as_slice().to_vec(),
            direction: nav.direction,
            status: nav.status,
            current_step,
        }
    }
}

impl<F: StepsForm> Drop for NavigationEngine<F> {
    fn drop(&mut self) {
        self.shared.timer().cancel();
    }
}

fn is_validating(nav: &NavState, generation: u64) -> bool {
    nav.status == NavigationStatus::Validating && nav.generation == generation
}
