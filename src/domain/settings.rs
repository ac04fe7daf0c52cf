//! Runtime-tunable chat settings

use serde::{Deserialize, Serialize};

fn default_similarity_threshold() -> f32 {
    0.8
}

fn default_learning_enabled() -> bool {
    true
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

/// Current settings snapshot. Owned by the
/// [`SettingsRegistry`](crate::infrastructure::SettingsRegistry); consumers
/// only ever see copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Minimum similarity for a cache entry to count as a hit (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Whether freshly generated responses are learned into the cache
    #[serde(default = "default_learning_enabled")]
    pub learning_enabled: bool,

    /// Identifier of the generative model to invoke on a miss
    #[serde(default = "default_model", alias = "model_identifier")]
    pub model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            learning_enabled: default_learning_enabled(),
            model: default_model(),
        }
    }
}

/// Sparse partial update. Unspecified fields preserve the prior value;
/// unknown keys in the source document are ignored by serde rather than
/// rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_enabled: Option<bool>,

    #[serde(
        default,
        alias = "model_identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub model: Option<String>,
}

impl SettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    pub fn with_learning_enabled(mut self, enabled: bool) -> Self {
        self.learning_enabled = Some(enabled);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.similarity_threshold.is_none()
            && self.learning_enabled.is_none()
            && self.model.is_none()
    }
}

/// A field rejected during an update, with the prior value retained.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedField {
    pub field: &'static str,
    pub reason: String,
}

/// Per-field result of applying a [`SettingsUpdate`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsUpdateOutcome {
    pub applied: Vec<&'static str>,
    pub rejected: Vec<RejectedField>,
}

impl SettingsUpdateOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}
