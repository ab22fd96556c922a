//! Training a 2-2-1 layered network on the XOR problem.
//!
//! Run with: `cargo run --example backprop_xor`
//!
//! Note: this topology has no bias units, so XOR cannot be separated
//! exactly — training settles on a plateau rather than reaching zero
//! error. The demo shows the training loop, callback, and evaluation
//! machinery, not a solved XOR.

use neurula::prelude::*;
use rand::Rng;
use std::collections::HashMap;

fn main() -> Result<()> {
    let mut net = Network::new();

    net.add_neuron_full("input1", 0.0, Some(Position::new(100.0, 100.0)), NeuronKind::Default, HashMap::new())?;
    net.add_neuron_full("input2", 0.0, Some(Position::new(100.0, 200.0)), NeuronKind::Default, HashMap::new())?;
    net.add_neuron_full("hidden1", 0.0, Some(Position::new(250.0, 100.0)), NeuronKind::Default, HashMap::new())?;
    net.add_neuron_full("hidden2", 0.0, Some(Position::new(250.0, 200.0)), NeuronKind::Default, HashMap::new())?;
    net.add_neuron_full("output", 0.0, Some(Position::new(400.0, 150.0)), NeuronKind::Default, HashMap::new())?;

    let mut rng = rand::thread_rng();
    for input in ["input1", "input2"] {
        for hidden in ["hidden1", "hidden2"] {
            net.connect(input, hidden, rng.gen_range(-0.5..0.5), false)?;
        }
    }
    for hidden in ["hidden1", "hidden2"] {
        net.connect(hidden, "output", rng.gen_range(-0.5..0.5), false)?;
    }

    let mut backprop = BackpropNetwork::new();
    backprop.set_layers(vec![
        vec!["input1".to_string(), "input2".to_string()],
        vec!["hidden1".to_string(), "hidden2".to_string()],
        vec!["output".to_string()],
    ]);
    backprop.learning_rate = 0.2;
    backprop.momentum = 0.9;

    let mut training_data: Vec<TrainingExample> = vec![
        (vec![0.0, 0.0], vec![0.0]),
        (vec![0.0, 100.0], vec![100.0]),
        (vec![100.0, 0.0], vec![100.0]),
        (vec![100.0, 100.0], vec![0.0]),
    ];

    println!("Training network on the XOR problem...");
    let errors = backprop.train_with_callback(
        &mut net,
        &mut training_data,
        1000,
        0.01,
        |epoch, error| {
            if epoch % 100 == 0 {
                println!("Epoch {epoch}: error = {error:.6}");
            }
            true
        },
    )?;
    println!("Stopped after {} epochs.", errors.len());

    println!("\nTesting trained network:");
    for (inputs, expected) in &training_data {
        let outputs = backprop.forward_pass(&mut net, inputs)?;
        let predicted = u8::from(outputs[0] > 50.0);
        let expected_bit = u8::from(expected[0] > 50.0);
        println!(
            "Input: {:?}, Output: {:.1}, Predicted: {predicted}, Expected: {expected_bit}",
            inputs.iter().map(|x| u8::from(*x > 50.0)).collect::<Vec<_>>(),
            outputs[0],
        );
    }
    Ok(())
}
