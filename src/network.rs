//! The network: neurons, connections, and activation state.
//!
//! The graph is backed by a stable petgraph digraph with a name index for
//! O(1) lookup. Neuron names are the public identity; node indices never
//! leak out of this module. Because edges live inside the graph store,
//! normal mutation can never produce a connection with a dangling
//! endpoint — removing a neuron removes its edges with it.

use crate::config::NetworkConfig;
use crate::connection::Connection;
use crate::error::{NetworkError, Result};
use crate::hebbian::HebbianLearning;
use crate::neuron::Neuron;
use crate::neurogenesis::Neurogenesis;
use crate::types::{now_secs, NeuronKind, Position, StateValue};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Structural and activity statistics for a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatistics {
    pub neurons: usize,
    pub connections: usize,
    /// Mean absolute connection weight.
    pub avg_weight: f64,
    /// Fraction of connections with positive weight.
    pub positive_ratio: f64,
    /// Fraction of connections with negative weight.
    pub negative_ratio: f64,
    /// Seconds since network creation.
    pub network_age: f64,
    pub update_count: u64,
}

/// An associative neural network: a directed weighted graph of named
/// neurons plus their current activation state.
///
/// The network is a continuously-mutable store driven by a single
/// external loop — it is not thread-safe and has no internal clock.
/// Learning and neurogenesis components are constructed explicitly via
/// [`Network::initialize_learning`]; calling [`Network::perform_learning`]
/// or [`Network::check_neurogenesis`] before that is a caller error.
#[derive(Debug)]
pub struct Network {
    graph: StableDiGraph<Neuron, Connection>,
    node_index: HashMap<String, NodeIndex>,
    pub(crate) state: HashMap<String, StateValue>,
    pub(crate) config: NetworkConfig,
    pub(crate) creation_time: f64,
    pub(crate) last_update_time: f64,
    pub(crate) update_count: u64,
    excluded: Vec<String>,
    pub(crate) learning: Option<HebbianLearning>,
    pub(crate) neurogenesis: Option<Neurogenesis>,
}

impl Network {
    pub fn new() -> Self {
        Self::with_config(NetworkConfig::default())
    }

    pub fn with_config(config: NetworkConfig) -> Self {
        let now = now_secs();
        Self {
            graph: StableDiGraph::new(),
            node_index: HashMap::new(),
            state: HashMap::new(),
            config,
            creation_time: now,
            last_update_time: now,
            update_count: 0,
            excluded: Vec::new(),
            learning: None,
            neurogenesis: None,
        }
    }

    // --- Graph mutation ---

    /// Add a neuron with default position, kind, and no attributes.
    pub fn add_neuron(
        &mut self,
        name: &str,
        initial_state: impl Into<StateValue>,
    ) -> Result<&Neuron> {
        self.add_neuron_full(name, initial_state, None, NeuronKind::Default, HashMap::new())
    }

    /// Add a neuron with explicit position, kind, and attributes.
    ///
    /// Seeds the state map with `initial_state`. Fails if the name is
    /// already taken; nothing is mutated in that case.
    pub fn add_neuron_full(
        &mut self,
        name: &str,
        initial_state: impl Into<StateValue>,
        position: Option<Position>,
        kind: NeuronKind,
        attributes: HashMap<String, Value>,
    ) -> Result<&Neuron> {
        if self.node_index.contains_key(name) {
            return Err(NetworkError::DuplicateNeuron(name.to_string()));
        }
        let mut neuron = Neuron::new(name, position, kind);
        neuron.attributes = attributes;
        let idx = self.graph.add_node(neuron);
        self.node_index.insert(name.to_string(), idx);
        self.state.insert(name.to_string(), initial_state.into());
        Ok(&self.graph[idx])
    }

    /// Create (or overwrite) the connection from `source` to `target`.
    ///
    /// With `bidirectional` set, the reverse connection is also created at
    /// the same initial weight if it does not exist yet. The two edges are
    /// independently owned thereafter — nothing keeps them in sync.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        weight: f64,
        bidirectional: bool,
    ) -> Result<()> {
        let src_idx = *self
            .node_index
            .get(source)
            .ok_or_else(|| NetworkError::UnknownNeuron(source.to_string()))?;
        let tgt_idx = *self
            .node_index
            .get(target)
            .ok_or_else(|| NetworkError::UnknownNeuron(target.to_string()))?;

        let forward = Connection::new(source, target, weight, bidirectional);
        if let Some(edge) = self.graph.find_edge(src_idx, tgt_idx) {
            self.graph[edge] = forward;
        } else {
            self.graph.add_edge(src_idx, tgt_idx, forward);
        }

        if bidirectional && self.graph.find_edge(tgt_idx, src_idx).is_none() {
            self.graph
                .add_edge(tgt_idx, src_idx, Connection::new(target, source, weight, true));
        }
        Ok(())
    }

    /// Remove a connection, returning it if it existed.
    pub fn remove_connection(&mut self, source: &str, target: &str) -> Option<Connection> {
        let src_idx = *self.node_index.get(source)?;
        let tgt_idx = *self.node_index.get(target)?;
        let edge = self.graph.find_edge(src_idx, tgt_idx)?;
        self.graph.remove_edge(edge)
    }

    /// Remove a neuron, its touching connections, and its state entry.
    pub fn remove_neuron(&mut self, name: &str) -> Result<()> {
        let idx = self
            .node_index
            .remove(name)
            .ok_or_else(|| NetworkError::UnknownNeuron(name.to_string()))?;
        self.graph.remove_node(idx);
        self.state.remove(name);
        self.excluded.retain(|n| n != name);
        Ok(())
    }

    /// Rename a neuron, remapping every touching connection and the state
    /// entry. Atomic: fails before any mutation if `old` is unknown or
    /// `new` is already taken.
    pub fn rename_neuron(&mut self, old: &str, new: &str) -> Result<()> {
        if self.node_index.contains_key(new) {
            return Err(NetworkError::DuplicateNeuron(new.to_string()));
        }
        let idx = *self
            .node_index
            .get(old)
            .ok_or_else(|| NetworkError::UnknownNeuron(old.to_string()))?;

        self.node_index.remove(old);
        self.node_index.insert(new.to_string(), idx);
        self.graph[idx].rename(new);

        let touching: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        for edge in touching {
            self.graph[edge].remap_endpoints(old, new);
        }

        if let Some(value) = self.state.remove(old) {
            self.state.insert(new.to_string(), value);
        }
        Ok(())
    }

    // --- State ---

    /// Update activation values for neurons already tracked in state.
    ///
    /// Keys without an existing state entry are silently ignored — state
    /// updates never create neurons. Each applied value is also recorded
    /// (normalized) in the neuron's activity history.
    pub fn update_state(&mut self, updates: &HashMap<String, StateValue>) {
        for (name, value) in updates {
            if !self.state.contains_key(name) {
                continue;
            }
            self.state.insert(name.clone(), value.clone());
            let normalized = self.get_neuron_value(name);
            if let Some(&idx) = self.node_index.get(name) {
                self.graph[idx].record_activity(normalized);
            }
        }
        self.last_update_time = now_secs();
        self.update_count += 1;
    }

    /// The neuron's activation on the fixed 0-100 numeric scale.
    ///
    /// Missing names read as 0.0 — stale references never halt a run.
    pub fn get_neuron_value(&self, name: &str) -> f64 {
        self.state.get(name).map(|v| v.normalized()).unwrap_or(0.0)
    }

    pub(crate) fn set_state_raw(&mut self, name: &str, value: f64) {
        self.state.insert(name.to_string(), StateValue::Number(value));
    }

    /// Spread activation along weighted edges for `steps` steps.
    ///
    /// Each step, every neuron with incoming connections takes the plain
    /// average of `source_value * weight` over those edges and blends it
    /// 70/30 with its current value, clamped to [0, 100]. All targets are
    /// computed from the pre-step snapshot; neurons with no incoming
    /// edges are left untouched.
    pub fn propagate_activation(&mut self, steps: usize) {
        for _ in 0..steps {
            let mut updates: Vec<(String, f64)> = Vec::new();
            for idx in self.graph.node_indices() {
                let mut incoming = 0.0;
                let mut count = 0usize;
                for edge in self.graph.edges_directed(idx, Direction::Incoming) {
                    let source = self.graph[edge.source()].name();
                    incoming += self.get_neuron_value(source) * edge.weight().weight();
                    count += 1;
                }
                if count == 0 {
                    continue;
                }
                let average = incoming / count as f64;
                let current = self.get_neuron_value(self.graph[idx].name());
                let blended = (current * 0.7 + average * 0.3).clamp(0.0, 100.0);
                updates.push((self.graph[idx].name().to_string(), blended));
            }
            for (name, value) in updates {
                self.state.insert(name, StateValue::Number(value));
            }
        }
    }

    // --- Learning ---

    /// Construct the Hebbian learning and neurogenesis components.
    ///
    /// Must be called before `perform_learning` / `check_neurogenesis`.
    pub fn initialize_learning(&mut self) {
        if self.learning.is_none() {
            self.learning = Some(HebbianLearning::new(&self.config));
        }
        if self.neurogenesis.is_none() {
            self.neurogenesis = Some(Neurogenesis::new());
        }
    }

    /// Run one Hebbian learning cycle.
    ///
    /// Returns the neuron pairs whose connections were reinforced.
    pub fn perform_learning(&mut self) -> Result<Vec<(String, String)>> {
        let mut learning = self
            .learning
            .take()
            .ok_or(NetworkError::LearningNotInitialized)?;
        let pairs = learning.perform_hebbian_learning(self);
        self.learning = Some(learning);
        Ok(pairs)
    }

    /// Feed environmental signals to the neurogenesis component and grow
    /// new neurons if triggers fire. Returns true iff a neuron was created.
    pub fn check_neurogenesis(&mut self, signals: &HashMap<String, StateValue>) -> Result<bool> {
        let mut neurogenesis = self
            .neurogenesis
            .take()
            .ok_or(NetworkError::LearningNotInitialized)?;
        let created = neurogenesis.check_neurogenesis(self, signals);
        self.neurogenesis = Some(neurogenesis);
        Ok(created)
    }

    pub fn hebbian(&self) -> Option<&HebbianLearning> {
        self.learning.as_ref()
    }

    pub fn hebbian_mut(&mut self) -> Option<&mut HebbianLearning> {
        self.learning.as_mut()
    }

    pub fn neurogenesis(&self) -> Option<&Neurogenesis> {
        self.neurogenesis.as_ref()
    }

    pub fn neurogenesis_mut(&mut self) -> Option<&mut Neurogenesis> {
        self.neurogenesis.as_mut()
    }

    // --- Exclusions ---

    /// Exclude a neuron from neurogenesis wiring.
    ///
    /// Hebbian selection keeps its own independent exclusion set; see
    /// [`crate::hebbian::HebbianLearning::exclude`].
    pub fn exclude_from_learning(&mut self, name: &str) {
        if !self.excluded.iter().any(|n| n == name) {
            self.excluded.push(name.to_string());
        }
    }

    pub fn include_in_learning(&mut self, name: &str) {
        self.excluded.retain(|n| n != name);
    }

    pub fn excluded_neurons(&self) -> &[String] {
        &self.excluded
    }

    pub(crate) fn is_excluded(&self, name: &str) -> bool {
        self.excluded.iter().any(|n| n == name)
    }

    // --- Queries ---

    pub fn neuron(&self, name: &str) -> Option<&Neuron> {
        self.node_index.get(name).map(|&idx| &self.graph[idx])
    }

    pub fn neuron_mut(&mut self, name: &str) -> Option<&mut Neuron> {
        self.node_index
            .get(name)
            .copied()
            .map(move |idx| &mut self.graph[idx])
    }

    pub fn neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.graph.node_weights()
    }

    pub fn neuron_names(&self) -> Vec<String> {
        self.graph.node_weights().map(|n| n.name().to_string()).collect()
    }

    pub fn connection(&self, source: &str, target: &str) -> Option<&Connection> {
        let src_idx = *self.node_index.get(source)?;
        let tgt_idx = *self.node_index.get(target)?;
        let edge = self.graph.find_edge(src_idx, tgt_idx)?;
        Some(&self.graph[edge])
    }

    pub(crate) fn connection_mut(&mut self, source: &str, target: &str) -> Option<&mut Connection> {
        let src_idx = *self.node_index.get(source)?;
        let tgt_idx = *self.node_index.get(target)?;
        let edge = self.graph.find_edge(src_idx, tgt_idx)?;
        Some(&mut self.graph[edge])
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.edge_weights()
    }

    /// Connection weight, or 0.0 if no such connection exists.
    pub fn get_connection_strength(&self, source: &str, target: &str) -> f64 {
        self.connection(source, target).map(|c| c.weight()).unwrap_or(0.0)
    }

    /// The `count` connections with the greatest absolute weight,
    /// descending. Ties break on ascending `(source, target)` name order,
    /// so the result is stable across calls.
    pub fn get_strongest_connections(&self, count: usize) -> Vec<(String, String, f64)> {
        let mut all: Vec<(String, String, f64)> = self
            .graph
            .edge_weights()
            .map(|c| (c.source().to_string(), c.target().to_string(), c.weight()))
            .collect();
        all.sort_by(|a, b| {
            b.2.abs()
                .partial_cmp(&a.2.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
                .then_with(|| a.1.cmp(&b.1))
        });
        all.truncate(count);
        all
    }

    pub fn state(&self) -> &HashMap<String, StateValue> {
        &self.state
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut NetworkConfig {
        &mut self.config
    }

    pub fn neuron_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn creation_time(&self) -> f64 {
        self.creation_time
    }

    pub fn last_update_time(&self) -> f64 {
        self.last_update_time
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Compute structural statistics. All ratios are 0 with no connections.
    pub fn get_network_statistics(&self) -> NetworkStatistics {
        let connections = self.graph.edge_count();
        let network_age = now_secs() - self.creation_time;
        if connections == 0 {
            return NetworkStatistics {
                neurons: self.graph.node_count(),
                connections: 0,
                avg_weight: 0.0,
                positive_ratio: 0.0,
                negative_ratio: 0.0,
                network_age,
                update_count: self.update_count,
            };
        }

        let total: f64 = self.graph.edge_weights().map(|c| c.weight().abs()).sum();
        let positive = self.graph.edge_weights().filter(|c| c.weight() > 0.0).count();
        let negative = self.graph.edge_weights().filter(|c| c.weight() < 0.0).count();

        NetworkStatistics {
            neurons: self.graph.node_count(),
            connections,
            avg_weight: total / connections as f64,
            positive_ratio: positive as f64 / connections as f64,
            negative_ratio: negative as f64 / connections as f64,
            network_age,
            update_count: self.update_count,
        }
    }

    /// Decay every connection weight by the configured factor.
    ///
    /// Returns how many connections moved by more than 0.0001.
    pub fn apply_weight_decay(&mut self) -> usize {
        let decay_factor = self.config.hebbian.weight_decay;
        let mut changed = 0;
        let edges: Vec<_> = self.graph.edge_indices().collect();
        for edge in edges {
            let conn = &mut self.graph[edge];
            let old = conn.weight();
            let new = conn.apply_decay(decay_factor);
            if (new - old).abs() > 0.0001 {
                changed += 1;
            }
        }
        changed
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}
