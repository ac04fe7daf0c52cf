//! Runtime settings registry
//!
//! Holds the live [`Settings`] behind a lock; updates validate each field
//! independently so one bad field never blocks the rest.

use std::sync::RwLock;

use tracing::{info, warn};

use crate::domain::{RejectedField, Settings, SettingsUpdate, SettingsUpdateOutcome};

#[derive(Debug)]
pub struct SettingsRegistry {
    inner: RwLock<Settings>,
}

impl SettingsRegistry {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    /// Snapshot of the current settings.
    pub fn get(&self) -> Settings {
        // A poisoned lock still holds a consistent Settings value.
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Apply a sparse update field by field. Invalid fields are rejected
    /// with the prior value retained; valid fields in the same update still
    /// apply.
    pub fn update(&self, update: SettingsUpdate) -> SettingsUpdateOutcome {
        let mut outcome = SettingsUpdateOutcome::default();
        let mut settings = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some(threshold) = update.similarity_threshold {
            if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
                settings.similarity_threshold = threshold;
                outcome.applied.push("similarity_threshold");
            } else {
                warn!(threshold, "Rejected similarity threshold outside [0, 1]");
                outcome.rejected.push(RejectedField {
                    field: "similarity_threshold",
                    reason: format!("must be between 0.0 and 1.0, got {}", threshold),
                });
            }
        }

        if let Some(enabled) = update.learning_enabled {
            settings.learning_enabled = enabled;
            outcome.applied.push("learning_enabled");
        }

        if let Some(model) = update.model {
            if model.trim().is_empty() {
                warn!("Rejected empty model identifier");
                outcome.rejected.push(RejectedField {
                    field: "model",
                    reason: "must not be empty".to_string(),
                });
            } else {
                settings.model = model;
                outcome.applied.push("model");
            }
        }

        if !outcome.applied.is_empty() {
            info!(applied = ?outcome.applied, "Settings updated");
        }

        outcome
    }
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
