//! Neurogenesis — growing new neurons from accumulated stimuli.
//!
//! Three exponentially-decaying counters track novelty, stress, and
//! reward exposure. When a counter crosses its threshold and the cooldown
//! has expired, a new neuron of that kind is created near the most active
//! region of the network and wired to every existing neuron. Counters
//! keep accumulating during cooldown — the organism still feels stimuli,
//! it just cannot grow.

use crate::network::Network;
use crate::types::{now_secs, NeuronKind, Position, StateValue};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;

/// The three stimulus kinds that can trigger growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Novelty,
    Stress,
    Reward,
}

impl TriggerKind {
    const ALL: [TriggerKind; 3] = [TriggerKind::Novelty, TriggerKind::Stress, TriggerKind::Reward];

    /// State key carrying this trigger's input signal.
    fn signal_key(&self) -> &'static str {
        match self {
            TriggerKind::Novelty => "novelty_exposure",
            TriggerKind::Stress => "sustained_stress",
            TriggerKind::Reward => "recent_rewards",
        }
    }

    /// Base for generated neuron names.
    fn base_name(&self) -> &'static str {
        match self {
            TriggerKind::Novelty => "novel",
            TriggerKind::Stress => "stress",
            TriggerKind::Reward => "reward",
        }
    }

    fn neuron_kind(&self) -> NeuronKind {
        match self {
            TriggerKind::Novelty => NeuronKind::Novelty,
            TriggerKind::Stress => NeuronKind::Stress,
            TriggerKind::Reward => NeuronKind::Reward,
        }
    }

    /// Fixed rotation applied to the placement angle, clustering each
    /// kind in its own direction around the anchor.
    fn angle_bias(&self) -> f64 {
        match self {
            TriggerKind::Novelty => PI / 6.0,
            TriggerKind::Stress => PI / 2.0,
            TriggerKind::Reward => PI,
        }
    }

    /// Concept neurons considered related to this trigger. A fixed
    /// lookup, not learned.
    fn related_neurons(&self) -> &'static [&'static str] {
        match self {
            TriggerKind::Novelty => &["curiosity"],
            TriggerKind::Stress => &["anxiety"],
            TriggerKind::Reward => &["satisfaction", "happiness"],
        }
    }
}

/// A snapshot of neurogenesis bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeurogenesisStats {
    pub total_new_neurons: usize,
    /// Seconds since the last successful neurogenesis.
    pub seconds_since_last: f64,
    pub novelty_counter: f64,
    pub stress_counter: f64,
    pub reward_counter: f64,
    pub new_neuron_names: Vec<String>,
}

/// Trigger accumulation and neuron creation for one network.
#[derive(Debug)]
pub struct Neurogenesis {
    pub(crate) novelty_counter: f64,
    pub(crate) stress_counter: f64,
    pub(crate) reward_counter: f64,
    pub(crate) last_neuron_time: f64,
    created: Vec<String>,
}

impl Neurogenesis {
    pub fn new() -> Self {
        Self {
            novelty_counter: 0.0,
            stress_counter: 0.0,
            reward_counter: 0.0,
            last_neuron_time: now_secs(),
            created: Vec::new(),
        }
    }

    fn counter_mut(&mut self, kind: TriggerKind) -> &mut f64 {
        match kind {
            TriggerKind::Novelty => &mut self.novelty_counter,
            TriggerKind::Stress => &mut self.stress_counter,
            TriggerKind::Reward => &mut self.reward_counter,
        }
    }

    fn threshold(net: &Network, kind: TriggerKind) -> f64 {
        let ng = &net.config.neurogenesis;
        match kind {
            TriggerKind::Novelty => ng.novelty_threshold,
            TriggerKind::Stress => ng.stress_threshold,
            TriggerKind::Reward => ng.reward_threshold,
        }
    }

    /// Accumulate signals and grow the network if triggers fire.
    ///
    /// Counters decay and accumulate on every call, cooldown or not; the
    /// cooldown only gates the creation step. Multiple triggers may fire
    /// in one call, each producing one neuron. Returns true iff at least
    /// one neuron was created. Never fails — malformed signals simply
    /// contribute nothing.
    pub fn check_neurogenesis(
        &mut self,
        net: &mut Network,
        signals: &HashMap<String, StateValue>,
    ) -> bool {
        let current_time = now_secs();
        let decay = net.config.neurogenesis.decay_rate;

        for kind in TriggerKind::ALL {
            let signal = signals
                .get(kind.signal_key())
                .and_then(|v| v.as_number())
                .unwrap_or(0.0);
            let counter = self.counter_mut(kind);
            *counter = *counter * decay + signal;
        }

        let cooldown = net.config.neurogenesis.cooldown;
        if current_time - self.last_neuron_time <= cooldown {
            return false;
        }

        let mut firing = Vec::new();
        for kind in TriggerKind::ALL {
            if *self.counter_mut(kind) > Self::threshold(net, kind) {
                *self.counter_mut(kind) = 0.0;
                firing.push(kind);
            }
        }

        let mut created = false;
        for kind in firing {
            if self.create_neuron(net, kind).is_some() {
                created = true;
            }
        }

        if created {
            self.last_neuron_time = current_time;
            let boost = net.config.combined.neurogenesis_learning_boost;
            if let Some(learning) = net.learning.as_mut() {
                learning.modify_learning_rate(boost);
            }
        }
        created
    }

    /// Create one neuron for a fired trigger. Returns its name, or None
    /// if the generated name already exists (possible after restoring a
    /// snapshot that contains earlier generated neurons).
    fn create_neuron(&mut self, net: &mut Network, kind: TriggerKind) -> Option<String> {
        let name = format!("{}_{}", kind.base_name(), self.created.len());
        let position = self.find_position(net, kind);

        if net
            .add_neuron_full(&name, 50.0, Some(position), kind.neuron_kind(), HashMap::new())
            .is_err()
        {
            return None;
        }
        self.wire_new_neuron(net, &name, kind);
        self.created.push(name.clone());
        Some(name)
    }

    /// Anchor near the most active neuron, offset by a random distance at
    /// a random angle rotated by the trigger's fixed bias. Falls back to
    /// a uniform position in the canvas region for an empty network.
    fn find_position(&self, net: &Network, kind: TriggerKind) -> Position {
        let mut rng = rand::thread_rng();

        let mut by_activity: Vec<(String, f64)> = net
            .neuron_names()
            .into_iter()
            .map(|name| {
                let value = net.get_neuron_value(&name);
                (name, value)
            })
            .collect();
        by_activity.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        by_activity.truncate(3);

        if let Some((anchor_name, _)) = by_activity.first() {
            let anchor = net
                .neuron(anchor_name)
                .map(|n| n.position)
                .unwrap_or_default();
            let angle = rng.gen_range(0.0..2.0 * PI) + kind.angle_bias();
            let distance = rng.gen_range(50.0..100.0);
            Position::new(
                anchor.x + angle.cos() * distance,
                anchor.y + angle.sin() * distance,
            )
        } else {
            Position::new(rng.gen_range(100.0..900.0), rng.gen_range(100.0..500.0))
        }
    }

    /// Bidirectionally connect the new neuron to every existing,
    /// non-excluded neuron. Related concept neurons get twice the
    /// configured strength; everyone else a random weight in
    /// [-strength, strength].
    fn wire_new_neuron(&self, net: &mut Network, new_name: &str, kind: TriggerKind) {
        let strength = net.config.neurogenesis.new_neuron_connection_strength;
        let related = kind.related_neurons();
        let mut rng = rand::thread_rng();

        for existing in net.neuron_names() {
            if existing == new_name || net.is_excluded(&existing) {
                continue;
            }
            let weight = if related.contains(&existing.as_str()) {
                strength * 2.0
            } else if strength > 0.0 {
                rng.gen_range(-strength..strength)
            } else {
                // A zero or negative strength is a valid (if odd) config;
                // sampling an empty range would panic.
                0.0
            };
            // Both endpoints exist; a failure here means a racing removal,
            // which single-threaded use rules out. Skip defensively.
            let _ = net.connect(new_name, &existing, weight, true);
        }
    }

    pub fn get_neurogenesis_stats(&self) -> NeurogenesisStats {
        NeurogenesisStats {
            total_new_neurons: self.created.len(),
            seconds_since_last: now_secs() - self.last_neuron_time,
            novelty_counter: self.novelty_counter,
            stress_counter: self.stress_counter,
            reward_counter: self.reward_counter,
            new_neuron_names: self.created.clone(),
        }
    }

    /// Zero the trigger counters.
    pub fn reset_counters(&mut self) {
        self.novelty_counter = 0.0;
        self.stress_counter = 0.0;
        self.reward_counter = 0.0;
    }
}

impl Default for Neurogenesis {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    fn signals(key: &str, value: f64) -> HashMap<String, StateValue> {
        let mut map = HashMap::new();
        map.insert(key.to_string(), StateValue::Number(value));
        map
    }

    fn expire_cooldown(net: &mut Network) {
        net.neurogenesis.as_mut().unwrap().last_neuron_time -= 1000.0;
    }

    #[test]
    fn novelty_trigger_creates_wired_neuron() {
        let mut net = Network::new();
        net.add_neuron("curiosity", 60.0).unwrap();
        net.add_neuron("calm", 20.0).unwrap();
        net.initialize_learning();
        expire_cooldown(&mut net);

        let created = net
            .check_neurogenesis(&signals("novelty_exposure", 4.0))
            .unwrap();
        assert!(created);

        let novel = net.neuron("novel_0").expect("novel_0 created");
        assert_eq!(novel.kind, NeuronKind::Novelty);
        assert_eq!(net.get_neuron_value("novel_0"), 50.0);

        // Bidirectionally connected to every prior neuron.
        assert!(net.connection("novel_0", "curiosity").is_some());
        assert!(net.connection("curiosity", "novel_0").is_some());
        assert!(net.connection("novel_0", "calm").is_some());
        assert!(net.connection("calm", "novel_0").is_some());

        // Related concept gets 2x the configured strength.
        assert!((net.get_connection_strength("novel_0", "curiosity") - 0.6).abs() < 1e-12);
    }

    #[test]
    fn cooldown_blocks_creation_but_not_accumulation() {
        let mut net = Network::new();
        net.add_neuron("a", 10.0).unwrap();
        net.initialize_learning();
        expire_cooldown(&mut net);

        assert!(net.check_neurogenesis(&signals("novelty_exposure", 4.0)).unwrap());
        let before = net.neuron_count();

        // Within cooldown now: no creation, but the counter still moves.
        assert!(!net.check_neurogenesis(&signals("novelty_exposure", 4.0)).unwrap());
        assert_eq!(net.neuron_count(), before);
        let stats = net.neurogenesis().unwrap().get_neurogenesis_stats();
        assert!((stats.novelty_counter - 4.0).abs() < 1e-12);
    }

    #[test]
    fn counters_decay_multiplicatively() {
        let mut net = Network::new();
        net.initialize_learning();
        // Keep the cooldown active so no creation interferes.
        net.check_neurogenesis(&signals("sustained_stress", 0.4)).unwrap();
        net.check_neurogenesis(&HashMap::new()).unwrap();

        let stats = net.neurogenesis().unwrap().get_neurogenesis_stats();
        assert!((stats.stress_counter - 0.4 * 0.95).abs() < 1e-12);
    }

    #[test]
    fn multiple_triggers_fire_in_one_call() {
        let mut net = Network::new();
        net.add_neuron("seed", 50.0).unwrap();
        net.initialize_learning();
        expire_cooldown(&mut net);

        let mut all = HashMap::new();
        all.insert("novelty_exposure".to_string(), StateValue::Number(5.0));
        all.insert("sustained_stress".to_string(), StateValue::Number(2.0));
        all.insert("recent_rewards".to_string(), StateValue::Number(2.0));
        assert!(net.check_neurogenesis(&all).unwrap());

        assert!(net.neuron("novel_0").is_some());
        assert!(net.neuron("stress_1").is_some());
        assert!(net.neuron("reward_2").is_some());
    }

    #[test]
    fn generated_names_count_monotonically() {
        let mut net = Network::new();
        net.initialize_learning();

        expire_cooldown(&mut net);
        net.check_neurogenesis(&signals("novelty_exposure", 5.0)).unwrap();
        assert!(net.neuron("novel_0").is_some());

        // Even after removal, the counter never reuses a suffix.
        net.remove_neuron("novel_0").unwrap();
        expire_cooldown(&mut net);
        net.check_neurogenesis(&signals("novelty_exposure", 5.0)).unwrap();
        assert!(net.neuron("novel_1").is_some());
        assert!(net.neuron("novel_0").is_none());
    }

    #[test]
    fn creation_boosts_hebbian_learning_rate() {
        let mut net = Network::new();
        net.initialize_learning();
        expire_cooldown(&mut net);

        net.check_neurogenesis(&signals("novelty_exposure", 5.0)).unwrap();
        // base 0.1 * boost 1.5
        assert!((net.hebbian().unwrap().learning_rate() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn excluded_neurons_are_not_wired() {
        let mut net = Network::new();
        net.add_neuron("wired", 10.0).unwrap();
        net.add_neuron("isolated", 10.0).unwrap();
        net.exclude_from_learning("isolated");
        net.initialize_learning();
        expire_cooldown(&mut net);

        net.check_neurogenesis(&signals("novelty_exposure", 5.0)).unwrap();
        assert!(net.connection("novel_0", "wired").is_some());
        assert!(net.connection("novel_0", "isolated").is_none());
        assert!(net.connection("isolated", "novel_0").is_none());
    }

    #[test]
    fn new_neuron_is_placed_near_most_active_anchor() {
        let mut net = Network::new();
        net.add_neuron_full(
            "hot",
            95.0,
            Some(Position::new(400.0, 300.0)),
            NeuronKind::Default,
            HashMap::new(),
        )
        .unwrap();
        net.add_neuron("cold", 5.0).unwrap();
        net.initialize_learning();
        expire_cooldown(&mut net);

        net.check_neurogenesis(&signals("novelty_exposure", 5.0)).unwrap();
        let pos = net.neuron("novel_0").unwrap().position;
        let anchor = Position::new(400.0, 300.0);
        let dist = anchor.distance_to(&pos);
        assert!((50.0..=100.0).contains(&dist), "distance was {dist}");
    }

    #[test]
    fn empty_network_uses_canvas_fallback() {
        let mut net = Network::new();
        net.initialize_learning();
        expire_cooldown(&mut net);

        net.check_neurogenesis(&signals("novelty_exposure", 5.0)).unwrap();
        let pos = net.neuron("novel_0").unwrap().position;
        assert!((100.0..=900.0).contains(&pos.x));
        assert!((100.0..=500.0).contains(&pos.y));
    }

    #[test]
    fn zero_connection_strength_wires_without_panicking() {
        let mut net = Network::new();
        net.config_mut().neurogenesis.new_neuron_connection_strength = 0.0;
        net.add_neuron("existing", 10.0).unwrap();
        net.initialize_learning();
        expire_cooldown(&mut net);

        assert!(net.check_neurogenesis(&signals("novelty_exposure", 5.0)).unwrap());
        assert_eq!(net.get_connection_strength("novel_0", "existing"), 0.0);
        assert!(net.connection("novel_0", "existing").is_some());
    }

    #[test]
    fn non_numeric_signals_contribute_nothing() {
        let mut net = Network::new();
        net.initialize_learning();
        let mut map = HashMap::new();
        map.insert("novelty_exposure".to_string(), StateValue::Text("lots".into()));
        net.check_neurogenesis(&map).unwrap();
        let stats = net.neurogenesis().unwrap().get_neurogenesis_stats();
        assert_eq!(stats.novelty_counter, 0.0);
    }

    #[test]
    fn reset_counters_zeroes_all_three() {
        let mut ng = Neurogenesis::new();
        ng.novelty_counter = 1.0;
        ng.stress_counter = 2.0;
        ng.reward_counter = 3.0;
        ng.reset_counters();
        let stats = ng.get_neurogenesis_stats();
        assert_eq!(stats.novelty_counter, 0.0);
        assert_eq!(stats.stress_counter, 0.0);
        assert_eq!(stats.reward_counter, 0.0);
    }
}
