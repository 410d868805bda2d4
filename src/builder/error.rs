//! Build errors for the engine builder.

use crate::core::StepSetViolation;
use thiserror::Error;

/// Errors that can occur when building a navigation engine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Form not specified. Call .form(form) or .shared_form(form) before .build()")]
    MissingForm,

    #[error("Invalid step declaration: {}", describe(.0))]
    InvalidSteps(Vec<StepSetViolation>),
}

impl BuildError {
    /// Violations behind an [`BuildError::InvalidSteps`] error.
    pub fn violations(&self) -> &[StepSetViolation] {
        match self {
            Self::InvalidSteps(violations) => violations,
            Self::MissingForm => &[],
        }
    }
}

fn describe(violations: &[StepSetViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
