//! # Neurula
//!
//! A small, continuously-evolving associative neural network: a directed
//! weighted graph of named neurons whose activations interact through
//! weighted connections, adapt via Hebbian co-activation learning, and
//! grow new nodes (neurogenesis) in response to accumulated environmental
//! signals. A biologically-inspired simulation toy, not an inference
//! engine.
//!
//! The engine is single-threaded and synchronous: a host application
//! pushes activation values into the [`network::Network`], propagates
//! them along weighted edges, and lets the adaptation components inspect
//! the result:
//!
//! - **Hebbian learning** — connections between co-active neurons are
//!   reinforced ("fire together, wire together"), throttled by a debounce
//!   window and a per-cycle pair cap.
//! - **Neurogenesis** — novelty, stress, and reward signals accumulate in
//!   decaying counters; crossing a threshold grows a new neuron wired
//!   into the existing graph, gated by a cooldown.
//! - **Backprop** — an optional supervised extension that trains an
//!   explicit layer topology over the same graph storage, bypassing the
//!   Hebbian dynamics entirely.
//!
//! ## Quick Start
//!
//! ```rust
//! use neurula::prelude::*;
//!
//! let mut net = Network::new();
//! net.add_neuron("sensor", 80.0).unwrap();
//! net.add_neuron("motor", 0.0).unwrap();
//! net.connect("sensor", "motor", 0.5, false).unwrap();
//! net.propagate_activation(1);
//! assert_eq!(net.get_neuron_value("motor"), 12.0);
//! ```

pub mod backprop;
pub mod config;
pub mod connection;
pub mod error;
pub mod hebbian;
pub mod network;
pub mod neurogenesis;
pub mod neuron;
pub mod prelude;
pub mod snapshot;
pub mod types;
