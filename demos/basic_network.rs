//! A small network driven by random stimuli, with Hebbian learning
//! and neurogenesis enabled.
//!
//! Run with: `cargo run --example basic_network`

use neurula::prelude::*;
use rand::Rng;
use std::collections::HashMap;

fn main() -> Result<()> {
    let mut net = Network::new();

    net.add_neuron_full("input1", 0.0, Some(Position::new(100.0, 100.0)), NeuronKind::Default, HashMap::new())?;
    net.add_neuron_full("input2", 0.0, Some(Position::new(100.0, 200.0)), NeuronKind::Default, HashMap::new())?;
    net.add_neuron_full("hidden1", 0.0, Some(Position::new(200.0, 150.0)), NeuronKind::Default, HashMap::new())?;
    net.add_neuron_full("output", 0.0, Some(Position::new(300.0, 150.0)), NeuronKind::Default, HashMap::new())?;

    net.connect("input1", "hidden1", 0.2, false)?;
    net.connect("input2", "hidden1", 0.3, false)?;
    net.connect("hidden1", "output", 0.5, false)?;

    net.initialize_learning();

    println!("Network structure created.");
    println!("Neurons: {}", net.neuron_count());
    println!("Connections: {}", net.connection_count());

    let mut rng = rand::thread_rng();
    println!("\nRunning simulation...");
    for i in 0..5 {
        let input1 = rng.gen_range(0.0..100.0);
        let input2 = rng.gen_range(0.0..100.0);

        let mut updates = HashMap::new();
        updates.insert("input1".to_string(), StateValue::Number(input1));
        updates.insert("input2".to_string(), StateValue::Number(input2));
        net.update_state(&updates);

        println!("\nIteration {}:", i + 1);
        println!("  Input1: {input1:.1}, Input2: {input2:.1}");

        net.propagate_activation(1);
        println!("  Hidden: {:.2}", net.get_neuron_value("hidden1"));
        println!("  Output: {:.2}", net.get_neuron_value("output"));

        let pairs = net.perform_learning()?;
        if !pairs.is_empty() {
            println!("  Learned pairs: {pairs:?}");
        }

        let mut signals = HashMap::new();
        signals.insert("novelty_exposure".to_string(), StateValue::Number(1.5));
        if net.check_neurogenesis(&signals)? {
            println!("  Neurogenesis fired!");
        }
    }

    let stats = net.get_network_statistics();
    println!("\nFinal statistics:");
    println!("  Neurons: {}", stats.neurons);
    println!("  Connections: {}", stats.connections);
    println!("  Mean |weight|: {:.3}", stats.avg_weight);
    println!("  Updates: {}", stats.update_count);

    for (source, target, weight) in net.get_strongest_connections(3) {
        println!("  {source} -> {target}: {weight:.3}");
    }
    Ok(())
}
