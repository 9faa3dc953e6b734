//! Evolving a 2-4-4-1 network to solve XOR.
//!
//! Run with: `RUST_LOG=info cargo run --example xor`

use symbios_neuroevolution::{
    EvolutionConfig, ParameterizedModel, algorithms::generational::Neuroevolution,
    network::{Activation, Architecture, FeedForwardNetwork},
};

const XOR_CASES: [([f32; 2], f32); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

/// Maximum fitness is 4.0 (perfect solution).
fn xor_fitness(net: &FeedForwardNetwork) -> f32 {
    let error: f32 = XOR_CASES
        .iter()
        .map(|(input, expected)| (net.evaluate(input)[0] - expected).powi(2))
        .sum();
    4.0 - error
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = EvolutionConfig::default()
        .with_population_size(100)
        .with_mutation_rate(0.1)
        .with_mutation_scale(0.5)
        .with_elite_fraction(0.1);
    let architecture = Architecture::new(vec![2, 4, 4, 1])?;
    let max_generations = 1000;

    println!("Neuroevolution XOR Example");
    println!("==========================\n");
    println!("Architecture: {:?}", architecture.layer_sizes());
    println!("Parameters per network: {}", architecture.parameter_count());
    println!("Population: {}", config.population_size);
    println!("Elite count: {}\n", config.elite_count());

    let mut engine =
        Neuroevolution::from_architecture(architecture, Activation::Sigmoid, config, 42)?;

    let summary = engine.run(&xor_fitness, max_generations, |stats| {
        if stats.generation % 50 == 0 {
            println!(
                "Gen {:4}: best={:.4}, avg={:.4}",
                stats.generation, stats.best_fitness, stats.mean_fitness
            );
        }
        // 4.0 is the ceiling of this particular fitness function.
        stats.best_fitness > 3.9
    })?;

    println!();
    if summary.stopped_early {
        println!("🎯 Solved at generation {}", summary.generations - 1);
    } else {
        println!("Stopped after {} generations", summary.generations);
    }

    let champion = engine.best().ok_or("final generation was not evaluated")?;
    println!("Best fitness: {:.4}\n", champion.fitness);
    println!("Champion XOR outputs:");
    for (input, expected) in &XOR_CASES {
        let output = champion.model.evaluate(input)[0];
        let status = if (output.round() - expected).abs() < 0.1 {
            "✓"
        } else {
            "✗"
        };
        println!(
            "  {} XOR {} = {:.4} (expected {}) {}",
            input[0] as i32, input[1] as i32, output, *expected as i32, status
        );
    }
    Ok(())
}
