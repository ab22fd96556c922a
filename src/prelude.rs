//! Convenient re-exports for typical engine use.

pub use crate::backprop::{sigmoid, BackpropNetwork, TrainingExample};
pub use crate::config::{CombinedConfig, HebbianConfig, NetworkConfig, NeurogenesisConfig};
pub use crate::connection::Connection;
pub use crate::error::{NetworkError, Result};
pub use crate::hebbian::{HebbianLearning, LearningEvent};
pub use crate::network::{Network, NetworkStatistics};
pub use crate::neurogenesis::{Neurogenesis, NeurogenesisStats, TriggerKind};
pub use crate::neuron::Neuron;
pub use crate::snapshot::NetworkSnapshot;
pub use crate::types::{NeuronKind, Position, StateValue};
