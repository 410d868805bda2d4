//! Effectful navigation built on the pure core.
//!
//! This module provides the "imperative shell" around [`crate::core`]:
//! asynchronous checks, the form collaborator, animation timers and the
//! engine that sequences them.
//!
//! # Key Concepts
//!
//! - **Engine**: Serialises navigation requests and commits them through
//!   [`crate::core::reduce`]
//! - **Gate**: Runs validation and interceptors in order, failing closed
//! - **Form**: The external field store the engine reads and validates

mod engine;
mod form;
mod gate;
mod timer;

pub use engine::{
    Interceptor, NavigationEngine, NavigationOutcome, NavigationRequest, StepHook, StepsState,
    SubmitHandler, SubmitResult,
};
pub use form::{FormState, StepsForm};
pub use gate::{CheckError, CheckResult, GateCheck, TransitionGate, Verdict};

pub(crate) use engine::{EngineParts, Hooks};
