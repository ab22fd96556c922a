//! A weighted directed edge between two neurons.

use crate::types::now_secs;
use std::collections::VecDeque;
use std::fmt;

/// How many (timestamp, weight) pairs a connection remembers.
const WEIGHT_HISTORY_CAPACITY: usize = 100;

/// A weighted connection from a source neuron to a target neuron.
///
/// Weights are always clamped to [-1.0, 1.0]; positive weights are
/// excitatory, negative inhibitory. Every mutation stamps the update
/// time and appends to a bounded audit history.
#[derive(Debug, Clone)]
pub struct Connection {
    source: String,
    target: String,
    weight: f64,
    /// Timestamp of connection creation.
    pub creation_time: f64,
    /// Timestamp of the last weight update.
    pub last_update: f64,
    /// Whether this edge was created as half of a bidirectional pair.
    /// The pair is not kept in sync after creation.
    pub bidirectional: bool,
    weight_history: VecDeque<(f64, f64)>,
}

impl Connection {
    pub fn new(source: &str, target: &str, weight: f64, bidirectional: bool) -> Self {
        let now = now_secs();
        let mut conn = Self {
            source: source.to_string(),
            target: target.to_string(),
            weight: 0.0,
            creation_time: now,
            last_update: now,
            bidirectional,
            weight_history: VecDeque::new(),
        };
        conn.set_weight(weight);
        conn
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Set the weight, clamping to [-1.0, 1.0].
    ///
    /// Always succeeds; returns the weight actually stored.
    pub fn set_weight(&mut self, weight: f64) -> f64 {
        self.weight = weight.clamp(-1.0, 1.0);
        self.last_update = now_secs();
        self.weight_history.push_back((self.last_update, self.weight));
        while self.weight_history.len() > WEIGHT_HISTORY_CAPACITY {
            self.weight_history.pop_front();
        }
        self.weight
    }

    /// Shrink the weight toward zero by `decay_factor`.
    ///
    /// Factors outside [0, 1] merely produce unusual magnitudes; the
    /// clamp in `set_weight` still bounds the result.
    pub fn apply_decay(&mut self, decay_factor: f64) -> f64 {
        self.set_weight(self.weight * (1.0 - decay_factor))
    }

    pub fn is_excitatory(&self) -> bool {
        self.weight > 0.0
    }

    pub fn is_inhibitory(&self) -> bool {
        self.weight < 0.0
    }

    /// Audit history of (timestamp, weight) pairs, oldest first.
    pub fn weight_history(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.weight_history.iter()
    }

    /// Rewrite endpoint names. Used by the network when a neuron is renamed.
    pub(crate) fn remap_endpoints(&mut self, old: &str, new: &str) {
        if self.source == old {
            self.source = new.to_string();
        }
        if self.target == old {
            self.target = new.to_string();
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Connection({} -> {}, weight={:.3})",
            self.source, self.target, self.weight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_is_clamped_on_every_path() {
        let mut conn = Connection::new("a", "b", 5.0, false);
        assert_eq!(conn.weight(), 1.0);
        assert_eq!(conn.set_weight(-7.3), -1.0);
        assert_eq!(conn.set_weight(0.4), 0.4);
    }

    #[test]
    fn decay_shrinks_toward_zero() {
        let mut conn = Connection::new("a", "b", 0.8, false);
        let decayed = conn.apply_decay(0.5);
        assert!((decayed - 0.4).abs() < 1e-12);

        let mut inhibitory = Connection::new("a", "b", -0.8, false);
        inhibitory.apply_decay(0.5);
        assert!((inhibitory.weight() + 0.4).abs() < 1e-12);
    }

    #[test]
    fn sign_tests() {
        let excit = Connection::new("a", "b", 0.2, false);
        assert!(excit.is_excitatory());
        assert!(!excit.is_inhibitory());

        let inhib = Connection::new("a", "b", -0.2, false);
        assert!(inhib.is_inhibitory());

        let zero = Connection::new("a", "b", 0.0, false);
        assert!(!zero.is_excitatory());
        assert!(!zero.is_inhibitory());
    }

    #[test]
    fn history_is_capped_at_100() {
        let mut conn = Connection::new("a", "b", 0.0, false);
        for i in 0..250 {
            conn.set_weight(i as f64 / 1000.0);
        }
        assert_eq!(conn.weight_history().count(), 100);
        // Oldest entries were evicted first; construction itself recorded
        // one entry, so the oldest survivor is the set at i = 150.
        let first = conn.weight_history().next().unwrap();
        assert!((first.1 - 0.150).abs() < 1e-12);
    }

    #[test]
    fn every_mutation_stamps_and_records() {
        let mut conn = Connection::new("a", "b", 0.1, false);
        let before = conn.weight_history().count();
        conn.set_weight(0.2);
        assert_eq!(conn.weight_history().count(), before + 1);
        assert!(conn.last_update >= conn.creation_time);
    }
}
