//! Stepflow: a navigation engine for multi-step forms
//!
//! Stepflow follows a "pure core, imperative shell" layout. The core decides
//! which steps are active, how history grows and shrinks, and which answers
//! belong to the walked path, all as pure functions. The shell runs the
//! asynchronous validation and interceptor checks, owns the animation timer
//! and serialises concurrent navigation requests.
//!
//! # Core Concepts
//!
//! - **Steps**: Ordered declarations, each optionally gated by a predicate
//!   over the current form values
//! - **History**: The deduplicated path actually walked, oldest first
//! - **Gate**: Validation and interceptors that must all pass, in order,
//!   before a move commits
//! - **Answers**: Form values restricted to fields owned by visited steps
//!
//! # Example
//!
//! ```rust
//! use stepflow::builder::EngineBuilder;
//! use stepflow::core::AnimationConfig;
//! use stepflow::effects::{FormState, StepsForm};
//! use stepflow::steps;
//! use serde_json::{json, Map};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let form = Arc::new(FormState::new(Map::new()));
//!     form.register_field("plan", "plan");
//!     form.register_field("seats", "team");
//!
//!     let engine = EngineBuilder::new()
//!         .steps(steps![
//!             "plan",
//!             "team" if |values| values.get("plan") == Some(&json!("team")),
//!             "review",
//!         ])
//!         .animate(AnimationConfig::disabled())
//!         .shared_form(Arc::clone(&form))
//!         .build()
//!         .unwrap();
//!
//!     form.set_value("plan", json!("solo"));
//!     form.set_value("seats", json!(5));
//!     assert!(engine.next().await.is_moved());
//!     assert_eq!(engine.current_step().id, "review");
//!
//!     // "team" was skipped, so its field is not part of the answers.
//!     let answers = engine.answers();
//!     assert_eq!(answers.get("plan"), Some(&json!("solo")));
//!     assert!(answers.get("seats").is_none());
//!     assert_eq!(form.values().len(), 2);
//! }
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod effects;

// Re-export commonly used types
pub use builder::{BuildError, EngineBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use core::{AnimationConfig, Direction, NavigationStatus, Step, StepId, StepSet, Values};
pub use effects::{
    FormState, NavigationEngine, NavigationOutcome, StepsForm, StepsState, SubmitResult,
};
