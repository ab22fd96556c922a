//! Hebbian learning — "neurons that fire together, wire together."
//!
//! Connections between simultaneously active neurons are reinforced in
//! proportion to the product of their normalized activations. Two
//! throttles keep the dynamics stable: a fixed 5-second debounce between
//! learning cycles, and a hard cap of 2 pair updates per cycle no matter
//! how many neurons are active.

use crate::config::NetworkConfig;
use crate::network::Network;
use crate::types::now_secs;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Minimum seconds between learning cycles. A fixed safety floor,
/// independent of the configurable `learning_interval`.
const MIN_LEARNING_INTERVAL_SECS: f64 = 5.0;

/// At most this many pair updates per cycle.
const MAX_PAIR_UPDATES: usize = 2;

/// How many learning events the log retains.
const EVENT_LOG_CAPACITY: usize = 100;

/// A recorded reinforcement between two co-active neurons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningEvent {
    pub timestamp: f64,
    pub neuron1: String,
    pub neuron2: String,
    pub value1: f64,
    pub value2: f64,
    pub prev_weight_forward: f64,
    pub new_weight_forward: f64,
    pub prev_weight_backward: f64,
    pub new_weight_backward: f64,
    pub learning_rate: f64,
}

/// Co-activation-driven weight reinforcement for one network.
///
/// Holds only algorithm-local state; the network is passed in per cycle.
#[derive(Debug)]
pub struct HebbianLearning {
    base_learning_rate: f64,
    learning_rate: f64,
    pub(crate) last_learning_time: f64,
    events: Vec<LearningEvent>,
    excluded: HashSet<String>,
}

impl HebbianLearning {
    pub fn new(config: &NetworkConfig) -> Self {
        let base = config.hebbian.base_learning_rate;
        Self {
            base_learning_rate: base,
            learning_rate: base,
            last_learning_time: now_secs(),
            events: Vec::new(),
            excluded: HashSet::new(),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Set the learning rate to `base_rate * factor`.
    ///
    /// Used to temporarily boost plasticity, e.g. after neurogenesis.
    pub fn modify_learning_rate(&mut self, factor: f64) -> f64 {
        self.learning_rate = self.base_learning_rate * factor;
        self.learning_rate
    }

    /// Exclude a neuron from this learner's active set.
    pub fn exclude(&mut self, name: &str) {
        self.excluded.insert(name.to_string());
    }

    pub fn include(&mut self, name: &str) {
        self.excluded.remove(name);
    }

    /// Run one learning cycle against the network's current state.
    ///
    /// No-ops inside the debounce window or with fewer than two active
    /// neurons. Otherwise samples at most two unordered pairs of active
    /// neurons and reinforces both directions of each sampled pair.
    /// Returns the pairs actually updated.
    pub fn perform_hebbian_learning(&mut self, net: &mut Network) -> Vec<(String, String)> {
        let current_time = now_secs();
        let mut updated_pairs = Vec::new();

        if current_time - self.last_learning_time < MIN_LEARNING_INTERVAL_SECS {
            return updated_pairs;
        }
        self.last_learning_time = current_time;

        let threshold = net.config.hebbian.active_threshold;
        let mut active: Vec<String> = net
            .state
            .keys()
            .filter(|name| !self.excluded.contains(name.as_str()))
            .filter(|name| net.get_neuron_value(name) > threshold)
            .cloned()
            .collect();
        // Stable enumeration order; the sampling below is random anyway.
        active.sort();

        if active.len() < 2 {
            return updated_pairs;
        }

        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for i in 0..active.len() {
            for j in (i + 1)..active.len() {
                pairs.push((i, j));
            }
        }
        let mut rng = rand::thread_rng();
        let sampled: Vec<(usize, usize)> = if pairs.len() > MAX_PAIR_UPDATES {
            pairs.choose_multiple(&mut rng, MAX_PAIR_UPDATES).copied().collect()
        } else {
            pairs
        };

        for (i, j) in sampled {
            let neuron1 = active[i].clone();
            let neuron2 = active[j].clone();
            let value1 = net.get_neuron_value(&neuron1);
            let value2 = net.get_neuron_value(&neuron2);
            if value1 > threshold && value2 > threshold {
                self.reinforce(net, &neuron1, &neuron2, value1, value2);
                updated_pairs.push((neuron1, neuron2));
            }
        }

        updated_pairs
    }

    /// Strengthen both directions between a co-active pair.
    fn reinforce(&mut self, net: &mut Network, neuron1: &str, neuron2: &str, value1: f64, value2: f64) {
        // Both neurons exist in state; connect cannot fail here unless a
        // state entry outlived its neuron, in which case we skip quietly.
        if net.connection(neuron1, neuron2).is_none()
            && net.connect(neuron1, neuron2, 0.0, false).is_err()
        {
            return;
        }
        if net.connection(neuron2, neuron1).is_none()
            && net.connect(neuron2, neuron1, 0.0, false).is_err()
        {
            return;
        }

        let weight_change = self.learning_rate * (value1 / 100.0) * (value2 / 100.0);

        let (prev_forward, new_forward) = match net.connection_mut(neuron1, neuron2) {
            Some(conn) => {
                let prev = conn.weight();
                (prev, conn.set_weight(prev + weight_change))
            }
            None => return,
        };
        let (prev_backward, new_backward) = match net.connection_mut(neuron2, neuron1) {
            Some(conn) => {
                let prev = conn.weight();
                (prev, conn.set_weight(prev + weight_change))
            }
            None => return,
        };

        self.events.push(LearningEvent {
            timestamp: now_secs(),
            neuron1: neuron1.to_string(),
            neuron2: neuron2.to_string(),
            value1,
            value2,
            prev_weight_forward: prev_forward,
            new_weight_forward: new_forward,
            prev_weight_backward: prev_backward,
            new_weight_backward: new_backward,
            learning_rate: self.learning_rate,
        });
        if self.events.len() > EVENT_LOG_CAPACITY {
            let excess = self.events.len() - EVENT_LOG_CAPACITY;
            self.events.drain(..excess);
        }
    }

    /// The most recent `count` learning events, oldest first.
    pub fn get_recent_learning_events(&self, count: usize) -> &[LearningEvent] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    /// Clear the learning event history.
    pub fn reset_learning_history(&mut self) {
        self.events.clear();
    }
}
