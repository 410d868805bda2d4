//! The external form collaborator.
//!
//! The engine never owns field state. It reads a values snapshot, asks the
//! form to validate itself, and asks it to restore defaults on reset.
//! [`FormState`] is an in-memory implementation suitable for hosts that do
//! not already have a form store, and for tests.

use crate::core::{FieldOwnership, StepId, Values};
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

/// Field store consulted by the navigation engine.
///
/// Side effects of validation, such as focusing the first invalid field,
/// belong to the implementor.
#[async_trait]
pub trait StepsForm: Send + Sync {
    /// Synchronous snapshot of every field value.
    fn values(&self) -> Values;

    /// Run field-level validation; `true` when every field is valid.
    async fn validate(&self) -> bool;

    /// Values restored by [`StepsForm::reset`].
    fn default_values(&self) -> Values;

    /// Restore raw field state to `defaults`.
    fn reset(&self, defaults: &Values);

    /// Snapshot of which step registered each field.
    fn ownership(&self) -> FieldOwnership;
}

type Validator = Arc<dyn Fn(Values) -> BoxFuture<'static, bool> + Send + Sync>;

/// In-memory form store with an optional asynchronous validator.
///
/// # Example
///
/// ```rust
/// use stepflow::effects::{FormState, StepsForm};
/// use serde_json::{json, Map};
///
/// let form = FormState::new(Map::new());
/// form.register_field("email", "contact");
/// form.set_value("email", json!("ada@example.com"));
///
/// assert_eq!(form.values()["email"], json!("ada@example.com"));
/// assert_eq!(form.fields_for_step(Some(&"contact".into())), vec!["email"]);
/// ```
pub struct FormState {
    defaults: Values,
    values: RwLock<Values>,
    ownership: RwLock<FieldOwnership>,
    validator: Option<Validator>,
}

impl FormState {
    /// Create a store whose current values start at `defaults`.
    pub fn new(defaults: Values) -> Self {
        Self {
            values: RwLock::new(defaults.clone()),
            defaults,
            ownership: RwLock::new(FieldOwnership::new()),
            validator: None,
        }
    }

    /// Validate with `validator`, which receives a values snapshot.
    ///
    /// Without a validator every submission is valid.
    pub fn with_validator<F, Fut>(mut self, validator: F) -> Self
    where
        F: Fn(Values) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.validator = Some(Arc::new(move |values| validator(values).boxed()));
        self
    }

    pub fn set_value(&self, name: impl Into<String>, value: Value) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value);
    }

    pub fn remove_value(&self, name: &str) -> Option<Value> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn value(&self, name: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Record that `name` is rendered by `step`.
    pub fn register_field(&self, name: impl Into<String>, step: impl Into<StepId>) {
        self.ownership
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register_field(name, step);
    }

    pub fn fields_for_step(&self, step: Option<&StepId>) -> Vec<String> {
        self.ownership
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .fields_for_step(step)
    }
}

#[async_trait]
impl StepsForm for FormState {
    fn values(&self) -> Values {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn validate(&self) -> bool {
        match &self.validator {
            Some(validator) => validator(self.values()).await,
            None => true,
        }
    }

    fn default_values(&self) -> Values {
        self.defaults.clone()
    }

    fn reset(&self, defaults: &Values) {
        *self.values.write().unwrap_or_else(PoisonError::into_inner) = defaults.clone();
    }

    fn ownership(&self) -> FieldOwnership {
        self.ownership
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
