//! A named node in the network graph.

use crate::types::{NeuronKind, Position};
use serde_json::Value;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::fmt;

/// How many recent activity values a neuron remembers.
pub const ACTIVITY_HISTORY_CAPACITY: usize = 10;

/// A single neuron: a named node with a position, a kind, arbitrary
/// attributes, and a rolling history of recent activation values.
///
/// The name is the neuron's identity and is immutable from outside the
/// network; renaming goes through `Network::rename_neuron`, which remaps
/// every touching edge and state entry atomically.
#[derive(Debug, Clone)]
pub struct Neuron {
    name: String,
    pub position: Position,
    pub kind: NeuronKind,
    pub attributes: HashMap<String, Value>,
    activity_history: VecDeque<f64>,
}

impl Neuron {
    pub fn new(name: &str, position: Option<Position>, kind: NeuronKind) -> Self {
        Self {
            name: name.to_string(),
            position: position.unwrap_or_default(),
            kind,
            attributes: HashMap::new(),
            activity_history: VecDeque::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = Position::new(x, y);
    }

    /// Record an activation value, keeping at most
    /// [`ACTIVITY_HISTORY_CAPACITY`] recent entries.
    pub fn record_activity(&mut self, value: f64) {
        self.activity_history.push_back(value);
        while self.activity_history.len() > ACTIVITY_HISTORY_CAPACITY {
            self.activity_history.pop_front();
        }
    }

    /// Arithmetic mean of recent activity, or 0 with no history.
    pub fn mean_activity(&self) -> f64 {
        if self.activity_history.is_empty() {
            return 0.0;
        }
        self.activity_history.iter().sum::<f64>() / self.activity_history.len() as f64
    }

    pub fn activity_history(&self) -> impl Iterator<Item = &f64> {
        self.activity_history.iter()
    }

    pub(crate) fn rename(&mut self, new_name: &str) {
        self.name = new_name.to_string();
    }
}

impl fmt::Display for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Neuron('{}', pos=({:.1}, {:.1}), kind='{}')",
            self.name,
            self.position.x,
            self.position.y,
            self.kind.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_history_is_bounded() {
        let mut neuron = Neuron::new("n", None, NeuronKind::Default);
        for i in 0..25 {
            neuron.record_activity(i as f64);
        }
        assert_eq!(neuron.activity_history().count(), 10);
        // Front-evicted: the oldest surviving entry is 15.
        assert_eq!(*neuron.activity_history().next().unwrap(), 15.0);
    }

    #[test]
    fn mean_activity_empty_is_zero() {
        let neuron = Neuron::new("n", None, NeuronKind::Default);
        assert_eq!(neuron.mean_activity(), 0.0);
    }

    #[test]
    fn mean_activity_is_arithmetic_mean() {
        let mut neuron = Neuron::new("n", None, NeuronKind::Default);
        neuron.record_activity(10.0);
        neuron.record_activity(20.0);
        neuron.record_activity(60.0);
        assert_eq!(neuron.mean_activity(), 30.0);
    }

    #[test]
    fn position_defaults_to_origin() {
        let mut neuron = Neuron::new("n", None, NeuronKind::Default);
        assert_eq!(neuron.position, Position::new(0.0, 0.0));
        neuron.set_position(-50.0, 1e6);
        assert_eq!(neuron.position, Position::new(-50.0, 1e6));
    }
}
