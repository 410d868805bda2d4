//! Navigation status and the pure state-transition function.
//!
//! Every change to navigation state goes through [`reduce`], which takes the
//! current state and an event and returns the next state. The engine in
//! `effects` is the imperative shell that decides which events to emit.

use super::history::HistoryLedger;
use super::step::StepId;
use super::step_set::ActiveSteps;
use serde::{Deserialize, Serialize};

/// What the engine is doing right now.
///
/// `Idle` is both the initial and the terminal status of every transition
/// cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationStatus {
    #[default]
    Idle,
    Validating,
    Transitioning,
}

/// Direction of the most recent transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Complete navigation state owned by an engine.
#[derive(Clone, Debug, PartialEq)]
pub struct NavState {
    pub status: NavigationStatus,
    pub direction: Direction,
    pub history: HistoryLedger,
    pub active: ActiveSteps,
    /// Incremented on every committed transition and on reset. Lets
    /// delayed events recognise that the state moved on without them.
    pub generation: u64,
}

impl NavState {
    pub fn new(history: HistoryLedger, active: ActiveSteps) -> Self {
        Self {
            status: NavigationStatus::Idle,
            direction: Direction::Forward,
            history,
            active,
            generation: 0,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn is_idle(&self) -> bool {
        self.status == NavigationStatus::Idle
    }
}

/// Inputs to [`reduce`].
#[derive(Clone, Debug, PartialEq)]
pub enum NavEvent {
    /// Checks are about to run.
    BeginChecks,
    /// Checks failed or no target resolved; return to idle untouched.
    Settle,
    /// Commit a forward move to `target` with a freshly computed active list.
    Advance {
        target: StepId,
        active: ActiveSteps,
        animated: bool,
    },
    /// Commit a backward move, truncating history at `target`.
    Retreat { target: StepId, animated: bool },
    /// The animation timer for `generation` elapsed.
    TransitionElapsed { generation: u64 },
    /// Restore the starting history.
    Reset {
        seed: Vec<StepId>,
        active: ActiveSteps,
    },
}

fn committed_status(animated: bool) -> NavigationStatus {
    if animated {
        NavigationStatus::Transitioning
    } else {
        NavigationStatus::Idle
    }
}

/// Compute the state that follows `state` after `event`.
///
/// This is a pure function: `state` is never modified.
///
/// # Example
///
/// ```rust
/// use stepflow::core::{reduce, HistoryLedger, NavEvent, NavState, NavigationStatus, StepId};
///
/// let state = NavState::new(HistoryLedger::new(StepId::new("a")), Default::default());
/// let validating = reduce(&state, NavEvent::BeginChecks);
/// assert_eq!(validating.status, NavigationStatus::Validating);
///
/// let idle = reduce(&validating, NavEvent::Settle);
/// assert_eq!(idle, state);
/// ```
pub fn reduce(state: &NavState, event: NavEvent) -> NavState {
    let mut next = state.clone();

    match event {
        NavEvent::BeginChecks => {
            next.status = NavigationStatus::Validating;
        }
        NavEvent::Settle => {
            next.status = NavigationStatus::Idle;
        }
        NavEvent::Advance {
            target,
            active,
            animated,
        } => {
            next.history.append(target);
            next.direction = Direction::Forward;
            next.active = active;
            next.status = committed_status(animated);
            next.generation += 1;
        }
        NavEvent::Retreat { target, animated } => {
            next.history.truncate_at(&target);
            next.direction = Direction::Backward;
            next.status = committed_status(animated);
            next.generation += 1;
        }
        NavEvent::TransitionElapsed { generation } => {
            if state.status == NavigationStatus::Transitioning && state.generation == generation {
                next.status = NavigationStatus::Idle;
            }
        }
        NavEvent::Reset { seed, active } => {
            next.history.reset(&seed);
            next.direction = Direction::Backward;
            next.status = NavigationStatus::Idle;
            next.active = active;
            next.generation += 1;
        }
    }

    next
}
