//! Configuration violations of a step declaration.

use super::step::StepId;
use thiserror::Error;

/// Problems found when checking a step declaration and its starting history.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StepSetViolation {
    #[error("No steps declared")]
    Empty,

    #[error("Step id '{id}' is declared {count} times")]
    DuplicateId { id: StepId, count: usize },

    #[error("Starting history references undeclared step '{id}'")]
    UnknownSeedStep { id: StepId },
}
