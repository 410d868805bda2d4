//! Builder API for ergonomic engine construction.
//!
//! This module provides a fluent builder and the `steps!` macro for
//! declaring a flow with minimal boilerplate.

pub mod engine;
pub mod error;
pub mod macros;

pub use engine::EngineBuilder;
pub use error::BuildError;

use crate::core::{Step, StepId};
use crate::effects::{NavigationEngine, StepsForm};

/// Build an engine over always-active steps with default animation.
///
/// # Example
///
/// ```
/// use stepflow::builder::linear_flow;
/// use stepflow::effects::FormState;
/// use serde_json::Map;
///
/// let engine = linear_flow(["name", "email", "done"], FormState::new(Map::new())).unwrap();
/// assert_eq!(engine.steps().len(), 3);
/// ```
pub fn linear_flow<I, S, F>(ids: I, form: F) -> Result<NavigationEngine<F>, BuildError>
where
    I: IntoIterator<Item = S>,
    S: Into<StepId>,
    F: StepsForm,
{
    EngineBuilder::new()
        .steps(ids.into_iter().map(Step::new))
        .form(form)
        .build()
}
