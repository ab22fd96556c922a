//! Shared types used across the simulation engine.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A position in the network's 2D layout field.
///
/// Positions exist for spatial organization and visualization;
/// the engine itself never validates bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// The kind of a neuron.
///
/// The first four kinds are produced by the engine itself (neurogenesis
/// tags new neurons with the trigger that created them); anything else is
/// caller-defined and carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NeuronKind {
    Default,
    Novelty,
    Stress,
    Reward,
    Custom(String),
}

impl NeuronKind {
    pub fn as_str(&self) -> &str {
        match self {
            NeuronKind::Default => "default",
            NeuronKind::Novelty => "novelty",
            NeuronKind::Stress => "stress",
            NeuronKind::Reward => "reward",
            NeuronKind::Custom(s) => s,
        }
    }
}

impl Default for NeuronKind {
    fn default() -> Self {
        NeuronKind::Default
    }
}

impl From<String> for NeuronKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "default" => NeuronKind::Default,
            "novelty" => NeuronKind::Novelty,
            "stress" => NeuronKind::Stress,
            "reward" => NeuronKind::Reward,
            _ => NeuronKind::Custom(s),
        }
    }
}

impl From<NeuronKind> for String {
    fn from(kind: NeuronKind) -> Self {
        kind.as_str().to_string()
    }
}

/// An activation value as pushed in by a host application.
///
/// State values arrive in whatever shape the host tracks them — numbers,
/// flags, labels. All learning code sees them through [`StateValue::normalized`],
/// which maps everything onto the 0-100 activation scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl StateValue {
    /// Fixed normalization rule: numbers pass through, true is full
    /// activation, false is none, and any text maps to the 75.0 sentinel.
    ///
    /// The text sentinel is deliberate — downstream learning treats a
    /// labeled state as "fairly active" regardless of content.
    pub fn normalized(&self) -> f64 {
        match self {
            StateValue::Number(n) => *n,
            StateValue::Flag(true) => 100.0,
            StateValue::Flag(false) => 0.0,
            StateValue::Text(_) => 75.0,
        }
    }

    /// The raw numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StateValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for StateValue {
    fn from(n: f64) -> Self {
        StateValue::Number(n)
    }
}

impl From<i32> for StateValue {
    fn from(n: i32) -> Self {
        StateValue::Number(n as f64)
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Flag(b)
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        StateValue::Text(s.to_string())
    }
}

/// Wall-clock seconds since the Unix epoch.
///
/// All engine timing (learning debounce, neurogenesis cooldown) is
/// wall-clock based and sampled synchronously at call time.
pub fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
