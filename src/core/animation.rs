//! Animation timing configuration.
//!
//! Only the timing contract matters here: when animation is enabled a
//! committed transition keeps the engine in `Transitioning` for the
//! configured duration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default transition duration (0.4 seconds).
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(400);

/// Where the step animation is applied by the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    #[default]
    Root,
    Child,
    None,
}

/// Animation settings for step transitions.
///
/// Deserializes from `{ "mode": "root" | "child" | "none", "duration": <seconds> }`,
/// both fields optional.
///
/// # Example
///
/// ```rust
/// use stepflow::core::{AnimationConfig, AnimationMode};
/// use std::time::Duration;
///
/// let config: AnimationConfig = serde_json::from_str(r#"{ "duration": 0.25 }"#).unwrap();
/// assert_eq!(config.mode, AnimationMode::Root);
/// assert_eq!(config.duration(), Duration::from_millis(250));
///
/// assert_eq!(AnimationConfig::disabled().duration(), Duration::ZERO);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub mode: AnimationMode,
    #[serde(rename = "duration", with = "seconds")]
    pub transition: Duration,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            mode: AnimationMode::Root,
            transition: DEFAULT_TRANSITION,
        }
    }
}

impl AnimationConfig {
    pub fn new(mode: AnimationMode, transition: Duration) -> Self {
        Self { mode, transition }
    }

    pub fn disabled() -> Self {
        Self {
            mode: AnimationMode::None,
            transition: Duration::ZERO,
        }
    }

    pub fn is_animated(&self) -> bool {
        self.mode != AnimationMode::None
    }

    /// Time the engine stays in `Transitioning`; zero when animation is off.
    pub fn duration(&self) -> Duration {
        if self.is_animated() {
            self.transition
        } else {
            Duration::ZERO
        }
    }
}

mod seconds {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}
