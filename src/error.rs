//! Error types for engine operations.
//!
//! Caller-input errors (duplicate names, unknown endpoints, layer
//! mismatches) are surfaced synchronously with no partial mutation.
//! Data anomalies inside the simulation are absorbed by defensive
//! fallbacks instead — the run must never halt over a stale reference.

use std::error::Error;
use std::fmt;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors that can occur during engine operations.
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// A neuron with this name already exists.
    DuplicateNeuron(String),
    /// No neuron with this name exists.
    UnknownNeuron(String),
    /// Learning components were not initialized before use.
    LearningNotInitialized,
    /// Backprop layers have not been defined.
    LayersNotSet,
    /// Target vector length does not match the output layer.
    TargetCountMismatch { expected: usize, found: usize },
    /// A snapshot could not be restored (all-or-nothing).
    SnapshotLoad(String),
    /// I/O errors (wrapped).
    Io(String),
    /// Serialization errors.
    Serialization(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::DuplicateNeuron(name) => {
                write!(f, "Neuron '{}' already exists", name)
            }
            NetworkError::UnknownNeuron(name) => {
                write!(f, "Neuron '{}' does not exist", name)
            }
            NetworkError::LearningNotInitialized => {
                write!(f, "Learning components not initialized (call initialize_learning first)")
            }
            NetworkError::LayersNotSet => write!(f, "Network layers not defined"),
            NetworkError::TargetCountMismatch { expected, found } => {
                write!(f, "Expected {} targets, got {}", expected, found)
            }
            NetworkError::SnapshotLoad(msg) => write!(f, "Snapshot load failed: {}", msg),
            NetworkError::Io(msg) => write!(f, "I/O error: {}", msg),
            NetworkError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl Error for NetworkError {}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        NetworkError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        NetworkError::Serialization(e.to_string())
    }
}
