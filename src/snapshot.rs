//! Snapshot persistence — save/load the full network as JSON.
//!
//! The document carries neurons (position, kind, attributes), connections
//! as explicit (source, target, weight, creation_time) records, the state
//! map, the learning configs, and metadata. Connections used to be keyed
//! by a `source_target` string in an earlier format, which misparsed
//! names containing underscores; the record list replaces it.
//!
//! Loading is all-or-nothing: the graph is rebuilt by replaying
//! `add_neuron`/`connect` into a fresh network, and any failure yields an
//! error with no partial network.

use crate::config::{HebbianConfig, NetworkConfig, NeurogenesisConfig};
use crate::error::{NetworkError, Result};
use crate::network::Network;
use crate::types::{NeuronKind, Position, StateValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Serializable form of the whole network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub neurons: HashMap<String, SerializedNeuron>,
    pub connections: Vec<SerializedConnection>,
    pub state: HashMap<String, StateValue>,
    pub config: SerializedConfig,
    pub metadata: SnapshotMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedNeuron {
    /// `[x, y]` pair.
    pub position: [f64; 2],
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedConnection {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub creation_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedConfig {
    pub hebbian: HebbianConfig,
    pub neurogenesis: NeurogenesisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub creation_time: f64,
    pub last_update: f64,
    pub update_count: u64,
}

impl Network {
    /// Serialize the network into a snapshot document.
    pub fn to_snapshot(&self) -> NetworkSnapshot {
        let neurons = self
            .neurons()
            .map(|n| {
                (
                    n.name().to_string(),
                    SerializedNeuron {
                        position: [n.position.x, n.position.y],
                        kind: n.kind.as_str().to_string(),
                        attributes: n.attributes.clone(),
                    },
                )
            })
            .collect();

        let connections = self
            .connections()
            .map(|c| SerializedConnection {
                source: c.source().to_string(),
                target: c.target().to_string(),
                weight: c.weight(),
                creation_time: c.creation_time,
            })
            .collect();

        NetworkSnapshot {
            neurons,
            connections,
            state: self.state().clone(),
            config: SerializedConfig {
                hebbian: self.config().hebbian.clone(),
                neurogenesis: self.config().neurogenesis.clone(),
            },
            metadata: SnapshotMetadata {
                creation_time: self.creation_time(),
                last_update: self.last_update_time(),
                update_count: self.update_count(),
            },
        }
    }

    /// Rebuild a network from a snapshot document.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Network> {
        let config = NetworkConfig {
            hebbian: snapshot.config.hebbian,
            neurogenesis: snapshot.config.neurogenesis,
            combined: Default::default(),
        };

        let mut net = Network::with_config(config);
        net.creation_time = snapshot.metadata.creation_time;
        net.last_update_time = snapshot.metadata.last_update;
        net.update_count = snapshot.metadata.update_count;

        for (name, data) in &snapshot.neurons {
            net.add_neuron_full(
                name,
                0.0,
                Some(Position::new(data.position[0], data.position[1])),
                NeuronKind::from(data.kind.clone()),
                data.attributes.clone(),
            )
            .map_err(|e| NetworkError::SnapshotLoad(e.to_string()))?;
        }

        for conn in &snapshot.connections {
            net.connect(&conn.source, &conn.target, conn.weight, false)
                .map_err(|e| NetworkError::SnapshotLoad(e.to_string()))?;
            if let Some(restored) = net.connection_mut(&conn.source, &conn.target) {
                restored.creation_time = conn.creation_time;
            }
        }

        // The persisted state replaces the add_neuron seeds wholesale.
        net.state = snapshot.state;
        Ok(net)
    }

    /// Save the network to a JSON file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.to_snapshot())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a network from a JSON file. All-or-nothing: any error yields
    /// no partial network.
    pub fn load(path: impl AsRef<Path>) -> Result<Network> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| NetworkError::SnapshotLoad(e.to_string()))?;
        let snapshot: NetworkSnapshot =
            serde_json::from_str(&json).map_err(|e| NetworkError::SnapshotLoad(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }
}
