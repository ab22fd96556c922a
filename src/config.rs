//! Configuration for learning and neurogenesis.
//!
//! Every parameter has a fixed numeric default; a config document on disk
//! only needs to name the fields it overrides — everything else merges in
//! from the defaults. Loading never has to succeed for the engine to run:
//! [`NetworkConfig::load_or_default`] falls back to defaults on any failure.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hebbian learning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HebbianConfig {
    /// Base rate for Hebbian weight reinforcement.
    pub base_learning_rate: f64,
    /// Activation threshold for learning. Vestigial — kept for
    /// compatibility, not read by the learning code.
    pub threshold: f64,
    /// Weight decay factor applied by `apply_weight_decay`.
    pub weight_decay: f64,
    /// Informational only — bounds are hard-coded in `Connection`.
    pub max_weight: f64,
    /// Informational only — bounds are hard-coded in `Connection`.
    pub min_weight: f64,
    /// Milliseconds between learning cycles. Vestigial — the learner
    /// enforces its own fixed 5-second floor instead.
    pub learning_interval: f64,
    /// Threshold on the 0-100 scale to consider a neuron active.
    pub active_threshold: f64,
}

impl Default for HebbianConfig {
    fn default() -> Self {
        Self {
            base_learning_rate: 0.1,
            threshold: 0.7,
            weight_decay: 0.01,
            max_weight: 1.0,
            min_weight: -1.0,
            learning_interval: 30000.0,
            active_threshold: 50.0,
        }
    }
}

/// Neurogenesis parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeurogenesisConfig {
    /// Novelty counter level that triggers a new neuron.
    pub novelty_threshold: f64,
    /// Stress counter level that triggers a new neuron.
    pub stress_threshold: f64,
    /// Reward counter level that triggers a new neuron.
    pub reward_threshold: f64,
    /// Seconds between neurogenesis events.
    pub cooldown: f64,
    /// Multiplicative decay applied to trigger counters every check.
    pub decay_rate: f64,
    /// Initial connection strength for newly created neurons.
    pub new_neuron_connection_strength: f64,
    /// Seconds to highlight new neurons. Visualization-only.
    pub highlight_duration: f64,
}

impl Default for NeurogenesisConfig {
    fn default() -> Self {
        Self {
            novelty_threshold: 3.0,
            stress_threshold: 0.7,
            reward_threshold: 0.6,
            cooldown: 300.0,
            decay_rate: 0.95,
            new_neuron_connection_strength: 0.3,
            highlight_duration: 5.0,
        }
    }
}

/// Parameters coupling the two adaptation mechanisms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedConfig {
    /// Learning-rate boost applied after neurogenesis fires.
    pub neurogenesis_learning_boost: f64,
    /// Reserved for goal-oriented learning. Not read by the engine.
    pub goal_reinforcement_factor: f64,
}

impl Default for CombinedConfig {
    fn default() -> Self {
        Self {
            neurogenesis_learning_boost: 1.5,
            goal_reinforcement_factor: 2.0,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hebbian: HebbianConfig,
    pub neurogenesis: NeurogenesisConfig,
    pub combined: CombinedConfig,
}

impl NetworkConfig {
    /// Load configuration from a JSON file.
    ///
    /// Fields absent from the document keep their defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load_from_file(path).unwrap_or_default()
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
