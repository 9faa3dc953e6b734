use symbios_neuroevolution::{
    EvolutionConfig, Evolver, ParameterizedModel,
    algorithms::generational::{DriverState, Neuroevolution},
    network::{Activation, Architecture, FeedForwardNetwork},
};

// --- Shared Infrastructure ---

const XOR_CASES: [([f32; 2], f32); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

/// Maximum fitness is 4.0 (zero squared error on every case).
fn xor_fitness(net: &FeedForwardNetwork) -> f32 {
    let error: f32 = XOR_CASES
        .iter()
        .map(|(input, expected)| (net.evaluate(input)[0] - expected).powi(2))
        .sum();
    4.0 - error
}

fn xor_engine(config: EvolutionConfig, seed: u64) -> Neuroevolution<FeedForwardNetwork> {
    let arch = Architecture::new(vec![2, 4, 4, 1]).unwrap();
    Neuroevolution::from_architecture(arch, Activation::Sigmoid, config, seed).unwrap()
}

fn snapshot(engine: &Neuroevolution<FeedForwardNetwork>) -> Vec<Vec<f32>> {
    engine.population().models().map(|m| m.parameters()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elites_follow_score_ranking() {
        let config = EvolutionConfig::default()
            .with_population_size(4)
            .with_elite_fraction(0.5)
            .with_mutation_rate(0.0);
        let mut engine = xor_engine(config, 42);
        let before = snapshot(&engine);

        engine.record_fitness(vec![0.1, 0.9, 0.4, 0.2]).unwrap();
        engine.advance_generation().unwrap();

        let after = snapshot(&engine);
        assert_eq!(after.len(), 4);
        assert_eq!(after[0], before[1], "rank 1 (score 0.9) should lead");
        assert_eq!(after[1], before[2], "rank 2 (score 0.4) should follow");
    }

    #[test]
    fn test_parameter_length_is_invariant_across_generations() {
        let config = EvolutionConfig::default()
            .with_population_size(12)
            .with_mutation_rate(0.5)
            .with_mutation_scale(2.0);
        let mut engine = xor_engine(config, 3);
        let expected = Architecture::new(vec![2, 4, 4, 1])
            .unwrap()
            .parameter_count();

        for _ in 0..10 {
            engine.step(&xor_fitness).unwrap();
            for model in engine.population().models() {
                assert_eq!(model.parameters().len(), expected);
                assert_eq!(model.parameter_count(), expected);
            }
        }
    }

    #[test]
    fn test_best_fitness_never_decreases_with_elitism() {
        let config = EvolutionConfig::default()
            .with_population_size(20)
            .with_elite_fraction(0.1)
            .with_mutation_rate(0.3)
            .with_mutation_scale(1.0);
        let mut engine = xor_engine(config, 17);

        let mut previous = f32::NEG_INFINITY;
        for _ in 0..30 {
            let stats = engine.step(&xor_fitness).unwrap();
            assert!(
                stats.best_fitness >= previous,
                "best fitness regressed from {} to {} at generation {}",
                previous,
                stats.best_fitness,
                stats.generation
            );
            previous = stats.best_fitness;
        }
    }

    #[test]
    fn test_full_elitism_reproduces_selected_elites() {
        let config = EvolutionConfig::default()
            .with_population_size(5)
            .with_elite_fraction(1.0)
            .with_mutation_rate(1.0)
            .with_mutation_scale(10.0);
        let mut engine = xor_engine(config, 8);
        let before = snapshot(&engine);

        engine.record_fitness(vec![0.3, 0.1, 0.5, 0.2, 0.4]).unwrap();
        engine.advance_generation().unwrap();

        let after = snapshot(&engine);
        let expected: Vec<Vec<f32>> = [2, 4, 0, 3, 1].iter().map(|&i| before[i].clone()).collect();
        assert_eq!(after, expected, "no member may be bred or mutated");
    }

    #[test]
    fn test_scores_reset_after_advancing() {
        // Half the population are elites carried over with their old scores.
        let config = EvolutionConfig::default()
            .with_population_size(6)
            .with_elite_fraction(0.5);
        let mut engine = xor_engine(config, 1);

        engine.evaluate(&xor_fitness);
        assert_eq!(engine.state(), DriverState::Evaluated);
        assert!(engine.scores().iter().any(|&s| s != 0.0));
        assert!(engine.best().is_some());

        engine.advance_generation().unwrap();
        assert_eq!(engine.state(), DriverState::AwaitingEvaluation);
        assert_eq!(engine.generation(), 1);
        assert!(engine.scores().iter().all(|&s| s == 0.0));
        assert!(engine.best().is_none(), "stale scores must not name a champion");
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let config = EvolutionConfig::default()
            .with_population_size(10)
            .with_mutation_rate(0.2);
        let mut a = xor_engine(config, 99);
        let mut b = xor_engine(config, 99);

        for _ in 0..5 {
            let sa = a.step(&xor_fitness).unwrap();
            let sb = b.step(&xor_fitness).unwrap();
            assert_eq!(sa, sb);
        }
        assert_eq!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn test_run_stops_on_caller_condition() {
        let config = EvolutionConfig::default().with_population_size(10);
        let mut engine = xor_engine(config, 5);

        let summary = engine.run(&xor_fitness, 50, |stats| stats.generation == 3).unwrap();
        assert!(summary.stopped_early);
        assert_eq!(summary.generations, 4);
        assert_eq!(summary.history.len(), 4);
        assert_eq!(engine.generation(), 3);
        assert_eq!(engine.state(), DriverState::Evaluated);
    }

    #[test]
    fn test_run_respects_generation_cap() {
        let config = EvolutionConfig::default().with_population_size(8);
        let mut engine = xor_engine(config, 6);

        let summary = engine.run(&xor_fitness, 7, |_| false).unwrap();
        assert!(!summary.stopped_early);
        assert_eq!(summary.generations, 7);
        assert_eq!(engine.generation(), 6);
        let best_seen = summary
            .history
            .iter()
            .map(|s| s.best_fitness)
            .fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(summary.best.best_fitness, best_seen);
    }

    #[test]
    fn test_xor_improves_over_random_start() {
        let config = EvolutionConfig::default()
            .with_population_size(60)
            .with_elite_fraction(0.1)
            .with_mutation_rate(0.2)
            .with_mutation_scale(0.5);
        let mut engine = xor_engine(config, 2024);

        let summary = engine.run(&xor_fitness, 150, |s| s.best_fitness > 3.9).unwrap();
        let first = summary.history[0].best_fitness;
        assert!(
            summary.best.best_fitness >= first,
            "evolution lost ground: start {}, best {}",
            first,
            summary.best.best_fitness
        );
        let champion = engine.best().expect("last generation is evaluated");
        assert_eq!(xor_fitness(&champion.model), champion.fitness);
    }
}
