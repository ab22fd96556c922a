//! Supervised training over a layered subgraph.
//!
//! Backprop bypasses the Hebbian dynamics entirely: the caller declares
//! an explicit ordered layer topology over existing neurons, and forward/
//! backward passes read and write the same network state and connection
//! weights directly. Only forward-direction edges participate — reverse
//! edges are ignored even when present.

use crate::error::{NetworkError, Result};
use crate::network::Network;
use rand::seq::SliceRandom;
use std::collections::HashMap;

/// Numerically guarded sigmoid. Returns 0 for inputs at or below -700
/// where `exp` would overflow.
pub fn sigmoid(x: f64) -> f64 {
    if x <= -700.0 {
        return 0.0;
    }
    1.0 / (1.0 + (-x).exp())
}

/// A training example: input values and target output values, both on
/// the 0-100 scale.
pub type TrainingExample = (Vec<f64>, Vec<f64>);

/// Layered supervised-learning extension for a network.
///
/// Holds only the layer topology and optimizer state; every pass takes
/// the network explicitly.
#[derive(Debug)]
pub struct BackpropNetwork {
    pub learning_rate: f64,
    pub momentum: f64,
    layers: Vec<Vec<String>>,
    prev_weight_changes: HashMap<(String, String), f64>,
}

impl BackpropNetwork {
    pub fn new() -> Self {
        Self {
            learning_rate: 0.1,
            momentum: 0.9,
            layers: Vec::new(),
            prev_weight_changes: HashMap::new(),
        }
    }

    /// Define the layer topology: first list is the input layer, last is
    /// the output layer. Resets the momentum cache.
    pub fn set_layers(&mut self, layers: Vec<Vec<String>>) {
        self.layers = layers;
        self.prev_weight_changes.clear();
    }

    pub fn layers(&self) -> &[Vec<String>] {
        &self.layers
    }

    /// Run a forward pass, writing activations into the network state.
    ///
    /// Inputs beyond the input layer's size are ignored; fewer inputs
    /// leave the remaining input neurons unset. Returns the output-layer
    /// values in layer order.
    pub fn forward_pass(&mut self, net: &mut Network, inputs: &[f64]) -> Result<Vec<f64>> {
        if self.layers.is_empty() {
            return Err(NetworkError::LayersNotSet);
        }

        for (neuron, value) in self.layers[0].iter().zip(inputs) {
            net.set_state_raw(neuron, *value);
        }

        for layer_idx in 1..self.layers.len() {
            // Split to satisfy the borrow checker: reads come from the
            // previous layer only, writes go to the current layer.
            let (prev_layer, current_layer) = {
                let (before, after) = self.layers.split_at(layer_idx);
                (&before[layer_idx - 1], &after[0])
            };
            for neuron in current_layer {
                let mut weighted_sum = 0.0;
                for prev in prev_layer {
                    if let Some(conn) = net.connection(prev, neuron) {
                        weighted_sum += conn.weight() * (net.get_neuron_value(prev) / 100.0);
                    }
                }
                net.set_state_raw(neuron, sigmoid(weighted_sum) * 100.0);
            }
        }

        Ok(self
            .layers
            .last()
            .map(|layer| layer.iter().map(|n| net.get_neuron_value(n)).collect())
            .unwrap_or_default())
    }

    /// Propagate errors backward and update weights.
    ///
    /// Returns (mean squared error over the output layer, sum of absolute
    /// weight deltas applied).
    pub fn backward_pass(&mut self, net: &mut Network, targets: &[f64]) -> Result<(f64, f64)> {
        if self.layers.is_empty() {
            return Err(NetworkError::LayersNotSet);
        }
        let output_layer = &self.layers[self.layers.len() - 1];
        if targets.len() != output_layer.len() {
            return Err(NetworkError::TargetCountMismatch {
                expected: output_layer.len(),
                found: targets.len(),
            });
        }

        let normalized_targets: Vec<f64> = targets.iter().map(|t| t / 100.0).collect();

        // Output deltas: error times the sigmoid derivative.
        let mut deltas: HashMap<String, f64> = HashMap::new();
        for (neuron, target) in output_layer.iter().zip(&normalized_targets) {
            let output = net.get_neuron_value(neuron) / 100.0;
            let error = target - output;
            deltas.insert(neuron.clone(), error * output * (1.0 - output));
        }

        // Hidden deltas, back to front.
        for layer_idx in (0..self.layers.len() - 1).rev() {
            for neuron in &self.layers[layer_idx] {
                let mut error_sum = 0.0;
                for next in &self.layers[layer_idx + 1] {
                    if let Some(conn) = net.connection(neuron, next) {
                        error_sum += conn.weight() * deltas.get(next).copied().unwrap_or(0.0);
                    }
                }
                let output = net.get_neuron_value(neuron) / 100.0;
                deltas.insert(neuron.clone(), error_sum * output * (1.0 - output));
            }
        }

        // Weight updates with momentum.
        let mut total_change = 0.0;
        for layer_idx in 0..self.layers.len() - 1 {
            for neuron in &self.layers[layer_idx] {
                let output = net.get_neuron_value(neuron) / 100.0;
                for next in &self.layers[layer_idx + 1] {
                    let key = (neuron.clone(), next.clone());
                    let Some(conn) = net.connection_mut(neuron, next) else {
                        continue;
                    };
                    let mut delta_w =
                        self.learning_rate * deltas.get(next).copied().unwrap_or(0.0) * output;
                    if let Some(prev) = self.prev_weight_changes.get(&key) {
                        delta_w += self.momentum * prev;
                    }
                    self.prev_weight_changes.insert(key, delta_w);
                    let old = conn.weight();
                    conn.set_weight(old + delta_w);
                    total_change += delta_w.abs();
                }
            }
        }

        let mse = output_layer
            .iter()
            .zip(&normalized_targets)
            .map(|(neuron, target)| {
                let output = net.get_neuron_value(neuron) / 100.0;
                (target - output).powi(2)
            })
            .sum::<f64>()
            / output_layer.len() as f64;

        Ok((mse, total_change))
    }

    /// Train until `epochs` is exhausted or the average epoch error drops
    /// to `target_error`. The training set is shuffled in place each
    /// epoch. Returns the per-epoch error sequence.
    pub fn train(
        &mut self,
        net: &mut Network,
        data: &mut [TrainingExample],
        epochs: usize,
        target_error: f64,
    ) -> Result<Vec<f64>> {
        self.train_with_callback(net, data, epochs, target_error, |_, _| true)
    }

    /// [`BackpropNetwork::train`] with a per-epoch callback. The callback
    /// receives (epoch index, average error); returning false stops
    /// training immediately.
    pub fn train_with_callback(
        &mut self,
        net: &mut Network,
        data: &mut [TrainingExample],
        epochs: usize,
        target_error: f64,
        mut callback: impl FnMut(usize, f64) -> bool,
    ) -> Result<Vec<f64>> {
        let mut errors = Vec::new();
        if data.is_empty() {
            return Ok(errors);
        }
        let mut rng = rand::thread_rng();

        for epoch in 0..epochs {
            data.shuffle(&mut rng);
            let mut epoch_error = 0.0;
            for (inputs, targets) in data.iter() {
                self.forward_pass(net, inputs)?;
                let (error, _) = self.backward_pass(net, targets)?;
                epoch_error += error;
            }
            let avg_error = epoch_error / data.len() as f64;
            errors.push(avg_error);

            if !callback(epoch, avg_error) {
                break;
            }
            if avg_error <= target_error {
                break;
            }
        }
        Ok(errors)
    }

    /// Argmax accuracy over a test set with one-hot-style targets.
    /// Returns 0.0 for an empty set.
    pub fn test(&mut self, net: &mut Network, data: &[TrainingExample]) -> Result<f64> {
        if data.is_empty() {
            return Ok(0.0);
        }
        let mut correct = 0usize;
        for (inputs, targets) in data {
            let outputs = self.forward_pass(net, inputs)?;
            let predicted = argmax(&outputs);
            let expected = argmax(targets);
            if predicted == expected {
                correct += 1;
            }
        }
        Ok(correct as f64 / data.len() as f64)
    }
}

impl Default for BackpropNetwork {
    fn default() -> Self {
        Self::new()
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    fn layered_net(weights: &[(&str, &str, f64)], names: &[&str]) -> Network {
        let mut net = Network::new();
        for name in names {
            net.add_neuron(name, 0.0).unwrap();
        }
        for (src, tgt, w) in weights {
            net.connect(src, tgt, *w, false).unwrap();
        }
        net
    }

    #[test]
    fn sigmoid_is_guarded() {
        assert_eq!(sigmoid(-700.0), 0.0);
        assert_eq!(sigmoid(-1e9), 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(50.0) > 0.999999);
    }

    #[test]
    fn passes_require_layers() {
        let mut net = Network::new();
        let mut bp = BackpropNetwork::new();
        assert!(matches!(
            bp.forward_pass(&mut net, &[1.0]),
            Err(NetworkError::LayersNotSet)
        ));
        assert!(matches!(
            bp.backward_pass(&mut net, &[1.0]),
            Err(NetworkError::LayersNotSet)
        ));
    }

    #[test]
    fn target_count_must_match_output_layer() {
        let mut net = layered_net(&[("i", "o", 0.5)], &["i", "o"]);
        let mut bp = BackpropNetwork::new();
        bp.set_layers(vec![vec!["i".into()], vec!["o".into()]]);
        assert!(matches!(
            bp.backward_pass(&mut net, &[50.0, 50.0]),
            Err(NetworkError::TargetCountMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn forward_pass_math() {
        // o = sigmoid(0.5 * 100/100) * 100
        let mut net = layered_net(&[("i", "o", 0.5)], &["i", "o"]);
        let mut bp = BackpropNetwork::new();
        bp.set_layers(vec![vec!["i".into()], vec!["o".into()]]);

        let out = bp.forward_pass(&mut net, &[100.0]).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0] - sigmoid(0.5) * 100.0).abs() < 1e-9);
        // Input was written straight into state.
        assert_eq!(net.get_neuron_value("i"), 100.0);
    }

    #[test]
    fn extra_inputs_are_ignored() {
        let mut net = layered_net(&[("i", "o", 0.5)], &["i", "o"]);
        let mut bp = BackpropNetwork::new();
        bp.set_layers(vec![vec!["i".into()], vec!["o".into()]]);
        bp.forward_pass(&mut net, &[30.0, 999.0]).unwrap();
        assert_eq!(net.get_neuron_value("i"), 30.0);
    }

    #[test]
    fn reverse_edges_are_not_consulted() {
        // Only o -> i exists; the forward pass sees no input edge and
        // o settles at sigmoid(0) = 50.
        let mut net = layered_net(&[("o", "i", 0.9)], &["i", "o"]);
        let mut bp = BackpropNetwork::new();
        bp.set_layers(vec![vec!["i".into()], vec!["o".into()]]);
        let out = bp.forward_pass(&mut net, &[100.0]).unwrap();
        assert!((out[0] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn backward_pass_moves_weight_toward_target() {
        let mut net = layered_net(&[("i", "o", -0.5)], &["i", "o"]);
        let mut bp = BackpropNetwork::new();
        bp.set_layers(vec![vec!["i".into()], vec!["o".into()]]);

        bp.forward_pass(&mut net, &[100.0]).unwrap();
        let before = net.get_connection_strength("i", "o");
        let (mse, change) = bp.backward_pass(&mut net, &[100.0]).unwrap();
        assert!(mse > 0.0);
        assert!(change > 0.0);
        // Output was too low; the weight must grow.
        assert!(net.get_connection_strength("i", "o") > before);
    }

    #[test]
    fn momentum_accumulates_previous_delta() {
        let mut net = layered_net(&[("i", "o", 0.0)], &["i", "o"]);
        let mut bp = BackpropNetwork::new();
        bp.set_layers(vec![vec!["i".into()], vec!["o".into()]]);

        bp.forward_pass(&mut net, &[100.0]).unwrap();
        let (_, first_change) = bp.backward_pass(&mut net, &[100.0]).unwrap();
        bp.forward_pass(&mut net, &[100.0]).unwrap();
        let (_, second_change) = bp.backward_pass(&mut net, &[100.0]).unwrap();
        // Second step carries 0.9 of the first delta on top of its own.
        assert!(second_change > first_change);
    }

    #[test]
    fn set_layers_resets_momentum_cache() {
        let mut net = layered_net(&[("i", "o", 0.0)], &["i", "o"]);
        let mut bp = BackpropNetwork::new();
        let topology = vec![vec!["i".to_string()], vec!["o".to_string()]];
        bp.set_layers(topology.clone());
        bp.forward_pass(&mut net, &[100.0]).unwrap();
        bp.backward_pass(&mut net, &[100.0]).unwrap();
        assert!(!bp.prev_weight_changes.is_empty());
        bp.set_layers(topology);
        assert!(bp.prev_weight_changes.is_empty());
    }

    #[test]
    fn training_converges_on_learnable_task() {
        // Drive a single badly-initialized connection toward its best
        // attainable mapping of 100 -> 100.
        let mut net = layered_net(&[("i", "o", -0.9)], &["i", "o"]);
        let mut bp = BackpropNetwork::new();
        bp.set_layers(vec![vec!["i".into()], vec!["o".into()]]);
        bp.learning_rate = 0.5;

        let mut data = vec![(vec![100.0], vec![100.0])];
        let errors = bp.train(&mut net, &mut data, 500, 0.08).unwrap();
        let last = *errors.last().unwrap();
        assert!(last < *errors.first().unwrap());
        // Weight saturates at the clamp; sigmoid(1.0) ~= 0.731.
        assert!(last < 0.08, "final error was {last}");
    }

    #[test]
    fn callback_false_stops_training() {
        let mut net = layered_net(&[("i", "o", 0.0)], &["i", "o"]);
        let mut bp = BackpropNetwork::new();
        bp.set_layers(vec![vec!["i".into()], vec!["o".into()]]);

        let mut data = vec![(vec![100.0], vec![100.0])];
        let errors = bp
            .train_with_callback(&mut net, &mut data, 100, 0.0, |epoch, _| epoch < 2)
            .unwrap();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn argmax_accuracy_on_one_hot_task() {
        // Hand-set weights: each input excites its own output and
        // inhibits the other, so argmax matches perfectly.
        let mut net = layered_net(
            &[
                ("i1", "o1", 1.0),
                ("i1", "o2", -1.0),
                ("i2", "o1", -1.0),
                ("i2", "o2", 1.0),
            ],
            &["i1", "i2", "o1", "o2"],
        );
        let mut bp = BackpropNetwork::new();
        bp.set_layers(vec![
            vec!["i1".into(), "i2".into()],
            vec!["o1".into(), "o2".into()],
        ]);

        let data = vec![
            (vec![100.0, 0.0], vec![100.0, 0.0]),
            (vec![0.0, 100.0], vec![0.0, 100.0]),
        ];
        assert_eq!(bp.test(&mut net, &data).unwrap(), 1.0);
    }

    #[test]
    fn empty_test_set_scores_zero() {
        let mut net = Network::new();
        let mut bp = BackpropNetwork::new();
        assert_eq!(bp.test(&mut net, &[]).unwrap(), 0.0);
    }

    #[test]
    fn hidden_layer_deltas_flow() {
        // 1-1-1 chain; training a single example should reduce error.
        let mut net = layered_net(&[("i", "h", 0.3), ("h", "o", -0.4)], &["i", "h", "o"]);
        let mut bp = BackpropNetwork::new();
        bp.set_layers(vec![vec!["i".into()], vec!["h".into()], vec!["o".into()]]);
        bp.learning_rate = 0.5;

        let mut data = vec![(vec![100.0], vec![100.0])];
        let errors = bp.train(&mut net, &mut data, 300, 0.0).unwrap();
        assert!(errors.last().unwrap() < errors.first().unwrap());
    }
}
