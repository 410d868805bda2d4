//! Sequential asynchronous checks guarding a transition.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, warn};

/// Outcome of a single check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Proceed,
    Block,
}

impl From<bool> for Verdict {
    fn from(proceed: bool) -> Self {
        if proceed {
            Self::Proceed
        } else {
            Self::Block
        }
    }
}

/// A check that returns nothing lets the transition through.
impl From<()> for Verdict {
    fn from(_: ()) -> Self {
        Self::Proceed
    }
}

/// `None` lets the transition through; only an explicit `false` blocks.
impl From<Option<bool>> for Verdict {
    fn from(proceed: Option<bool>) -> Self {
        proceed.map_or(Self::Proceed, Self::from)
    }
}

/// Errors raised by a check. The gate treats every error as a block.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum CheckError {
    #[error("Navigation check failed: {0}")]
    Failed(String),

    #[error("Navigation check panicked: {0}")]
    Panicked(String),
}

impl CheckError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

pub type CheckResult = Result<Verdict, CheckError>;

type CheckThunk<'a> = Box<dyn FnOnce() -> BoxFuture<'a, CheckResult> + Send + 'a>;

/// A labelled, not yet started check.
///
/// The check's future is only created once every earlier check resolved, so
/// any work done while building it also happens in order.
pub struct GateCheck<'a> {
    label: &'static str,
    thunk: CheckThunk<'a>,
}

impl<'a> GateCheck<'a> {
    pub fn new<F, Fut>(label: &'static str, check: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = CheckResult> + Send + 'a,
    {
        Self {
            label,
            thunk: Box::new(move || check().boxed()),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Runs checks one after another and fails closed.
pub struct TransitionGate;

impl TransitionGate {
    /// Run `checks` strictly in order.
    ///
    /// Returns `false` as soon as a check blocks, returns an error or panics;
    /// later checks are then never started. Errors and panics are logged and
    /// never propagate.
    pub async fn run(checks: Vec<GateCheck<'_>>) -> bool {
        for check in checks {
            let label = check.label;
            let thunk = check.thunk;
            let outcome = AssertUnwindSafe(async move { thunk().await })
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(CheckError::Panicked(panic_message(&*panic))));

            match outcome {
                Ok(Verdict::Proceed) => continue,
                Ok(Verdict::Block) => {
                    debug!(check = label, "navigation blocked by check");
                    return false;
                }
                Err(err @ CheckError::Panicked(_)) => {
                    error!(check = label, error = %err, "navigation check panicked");
                    return false;
                }
                Err(err) => {
                    warn!(check = label, error = %err, "navigation check failed");
                    return false;
                }
            }
        }
        true
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
