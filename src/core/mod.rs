//! Pure navigation core.
//!
//! This module contains the side-effect free half of the engine:
//! - Step declarations with activation rules, and active-step filtering
//! - The history ledger
//! - Navigation status and the pure state-transition function
//! - History-scoped answer projection
//! - Visibility rules for navigation controls
//!
//! Nothing in here awaits, spawns or logs.

mod animation;
mod answers;
mod history;
mod status;
mod step;
mod step_set;
mod violations;
mod visibility;

pub use animation::{AnimationConfig, AnimationMode, DEFAULT_TRANSITION};
pub use answers::{project, FieldOwnership, Values};
pub use history::{HistoryLedger, LedgerError};
pub use status::{reduce, Direction, NavEvent, NavState, NavigationStatus};
pub use step::{ActivationPredicate, ActivationRule, Step, StepId};
pub use step_set::{filter_active, ActiveSteps, StepSet};
pub use violations::StepSetViolation;
pub use visibility::{is_visible, ButtonVisibility, CurrentStep, LAST_STEP};
