//! A short survey with a conditional step, an interceptor and a submit handler.
//!
//! Run with `RUST_LOG=stepflow=debug cargo run --example survey` to see the
//! engine's tracing output.

use serde_json::{json, Map};
use std::sync::Arc;
use std::time::Duration;
use stepflow::builder::EngineBuilder;
use stepflow::core::{AnimationConfig, AnimationMode, Values};
use stepflow::effects::{CheckError, FormState, NavigationRequest, StepsForm};
use stepflow::steps;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut defaults = Map::new();
    defaults.insert("name".into(), json!(""));
    let form = Arc::new(
        FormState::new(defaults).with_validator(|values: Values| async move {
            values
                .get("name")
                .and_then(|name| name.as_str())
                .is_some_and(|name| !name.is_empty())
        }),
    );
    form.register_field("name", "about");
    form.register_field("has_pets", "about");
    form.register_field("pet", "pets");
    form.register_field("rating", "feedback");

    let engine = EngineBuilder::new()
        .steps(steps![
            "about",
            "pets" if |values: &Values| values.get("has_pets") == Some(&json!(true)),
            "feedback",
        ])
        .animate(AnimationConfig::new(
            AnimationMode::Root,
            Duration::from_millis(150),
        ))
        .shared_form(Arc::clone(&form))
        .on_forward(|request: NavigationRequest| async move {
            println!(
                "leaving {} (step {} of {})",
                request.state.current_step.id,
                request.state.history.len(),
                request.state.active_steps.len()
            );
            Ok::<_, CheckError>(())
        })
        .on_step_enter(|step, _values| println!("entered {}", step.id))
        .on_submit(|result| async move {
            println!("submitted answers: {}", json!(result.answers));
        })
        .build()?;

    println!("next without a name: {:?}", engine.next().await);

    form.set_value("name", json!("Ada"));
    form.set_value("has_pets", json!(true));
    println!("next: {:?}", engine.next().await);
    tokio::time::sleep(Duration::from_millis(200)).await;

    form.set_value("pet", json!("cat"));
    println!("changed mind, back: {:?}", engine.prev().await);
    tokio::time::sleep(Duration::from_millis(200)).await;

    form.set_value("has_pets", json!(false));
    println!("next: {:?}", engine.next().await);
    tokio::time::sleep(Duration::from_millis(200)).await;

    form.set_value("rating", json!(5));
    if let Some(result) = engine.submit().await {
        println!("raw values still hold the pet: {}", result.values.contains_key("pet"));
    }

    println!("checkpoint: {}", engine.checkpoint().to_json()?);
    println!("form values: {}", json!(form.values()));
    Ok(())
}
