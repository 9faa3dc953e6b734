//! Generational neuroevolution driver.
//!
//! # Overview
//!
//! [`Neuroevolution`] owns a fixed-size population of models and alternates
//! between two states:
//!
//! - **AwaitingEvaluation**: scores are stale. [`Neuroevolution::evaluate`] or
//!   [`Neuroevolution::record_fitness`] installs a full set of scores.
//! - **Evaluated**: scores describe the current population.
//!   [`Neuroevolution::advance_generation`] breeds the successor and returns
//!   to AwaitingEvaluation.
//!
//! The driver never decides when to stop. Callers inspect the
//! [`GenerationStats`] returned by each evaluation, or hand a predicate to
//! [`Neuroevolution::run`].
//!
//! # Example
//!
//! ```rust
//! use symbios_neuroevolution::{
//!     EvolutionConfig, ParameterizedModel, algorithms::generational::Neuroevolution,
//!     network::{Activation, Architecture, FeedForwardNetwork},
//! };
//!
//! let arch = Architecture::new(vec![1, 2, 1]).unwrap();
//! let config = EvolutionConfig::default().with_population_size(16);
//! let mut engine =
//!     Neuroevolution::from_architecture(arch, Activation::Tanh, config, 7).unwrap();
//!
//! let target = |net: &FeedForwardNetwork| -(net.evaluate(&[0.5])[0] - 0.25).abs();
//! for _ in 0..10 {
//!     let stats = engine.evaluate(&target);
//!     if stats.best_fitness > -0.01 {
//!         break;
//!     }
//!     engine.advance_generation().unwrap();
//! }
//! ```
//!
//! # Determinism
//!
//! All randomness flows from one seeded [`Pcg64`]. Evaluation never touches
//! the generator, so enabling the `parallel` feature does not change results.

use crate::config::EvolutionConfig;
use crate::error::{NeuroError, Result};
use crate::network::{Activation, Architecture, FeedForwardNetwork};
use crate::operators::{crossover, mutate};
use crate::population::{GenerationStats, Individual, Population};
use crate::selection::select_parents;
use crate::{Evolver, FitnessEvaluator, ParameterizedModel};
use rand::Rng;
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Where the driver is in the evaluate/advance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverState {
    AwaitingEvaluation,
    Evaluated,
}

/// Outcome of [`Neuroevolution::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of generations evaluated.
    pub generations: usize,
    /// Statistics of the generation holding the best score seen.
    pub best: GenerationStats,
    /// One entry per evaluated generation, oldest first.
    pub history: Vec<GenerationStats>,
    /// `true` if the stop predicate fired before `max_generations`.
    pub stopped_early: bool,
}

pub struct Neuroevolution<M: ParameterizedModel> {
    population: Population<M>,
    config: EvolutionConfig,
    generation: usize,
    state: DriverState,
    last_stats: Option<GenerationStats>,
    rng: Pcg64,
}

impl<M: ParameterizedModel> Neuroevolution<M> {
    /// Creates a driver over an explicit initial population.
    ///
    /// # Errors
    ///
    /// - [`NeuroError::InvalidConfiguration`] if `config` fails validation or
    ///   `initial.len()` differs from `config.population_size`
    /// - [`NeuroError::ShapeMismatch`] if the models disagree on parameter count
    pub fn new(initial: Vec<M>, config: EvolutionConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        if initial.len() != config.population_size {
            return Err(NeuroError::InvalidConfiguration(format!(
                "population_size is {} but {} initial models were supplied",
                config.population_size,
                initial.len()
            )));
        }
        Ok(Self {
            population: Population::new(initial)?,
            config,
            generation: 0,
            state: DriverState::AwaitingEvaluation,
            last_stats: None,
            rng: Pcg64::seed_from_u64(seed),
        })
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn population(&self) -> &Population<M> {
        &self.population
    }

    /// Current scores in population order.
    pub fn scores(&self) -> Vec<f32> {
        self.population.scores()
    }

    /// Best individual of the current population, or `None` while its
    /// scores are stale.
    pub fn best(&self) -> Option<&Individual<M>> {
        match self.state {
            DriverState::Evaluated => self.population.best(),
            DriverState::AwaitingEvaluation => None,
        }
    }

    /// Statistics of the most recent evaluation pass.
    pub fn last_stats(&self) -> Option<GenerationStats> {
        self.last_stats
    }

    /// Scores every individual with `evaluator`.
    ///
    /// Scores are computed into a separate buffer and installed only once
    /// all of them exist, so a panicking evaluator leaves the population
    /// untouched.
    pub fn evaluate<E: FitnessEvaluator<M>>(&mut self, evaluator: &E) -> GenerationStats {
        #[cfg(feature = "parallel")]
        let scores: Vec<f32> = self
            .population
            .individuals()
            .par_iter()
            .map(|ind| evaluator.evaluate(&ind.model))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let scores: Vec<f32> = self
            .population
            .individuals()
            .iter()
            .map(|ind| evaluator.evaluate(&ind.model))
            .collect();

        self.install(&scores)
    }

    /// Installs scores computed outside the driver.
    ///
    /// # Errors
    ///
    /// Returns [`NeuroError::ScoreCountMismatch`] unless there is exactly one
    /// score per individual.
    pub fn record_fitness(&mut self, scores: Vec<f32>) -> Result<GenerationStats> {
        if scores.len() != self.population.len() {
            return Err(NeuroError::ScoreCountMismatch {
                expected: self.population.len(),
                actual: scores.len(),
            });
        }
        Ok(self.install(&scores))
    }

    fn install(&mut self, scores: &[f32]) -> GenerationStats {
        self.population.install_scores(scores);
        self.state = DriverState::Evaluated;
        let stats = self.population.stats(self.generation);
        log::debug!(
            "generation {}: best {:.4} (#{}), mean {:.4}, worst {:.4}",
            stats.generation,
            stats.best_fitness,
            stats.best_index,
            stats.mean_fitness,
            stats.worst_fitness
        );
        self.last_stats = Some(stats);
        stats
    }

    /// Replaces the evaluated population with its offspring.
    ///
    /// Elites are copied unchanged; every other slot is a mutated uniform
    /// crossover of two parents drawn with replacement from the selected
    /// parent list. The successor is built in full before it replaces the
    /// current population, so on error nothing changes.
    ///
    /// # Errors
    ///
    /// - [`NeuroError::NotEvaluated`] if the current scores are stale
    /// - [`NeuroError::ShapeMismatch`] if a model reports an inconsistent layout
    pub fn advance_generation(&mut self) -> Result<()> {
        if self.state != DriverState::Evaluated {
            return Err(NeuroError::NotEvaluated {
                generation: self.generation,
            });
        }

        let size = self.config.population_size;
        let elite_count = self.config.elite_count();
        let parents = select_parents(
            &self.population.scores(),
            self.config.elite_fraction,
            &mut self.rng,
        );
        let members = self.population.individuals();

        let mut next: Vec<Individual<M>> = Vec::with_capacity(size);
        next.extend(parents[..elite_count].iter().map(|&p| members[p].clone()));

        while next.len() < size {
            let a = parents[self.rng.random_range(0..parents.len())];
            let b = parents[self.rng.random_range(0..parents.len())];
            let mut child = crossover(&members[a].model, &members[b].model, &mut self.rng)?;
            mutate(
                &mut child,
                self.config.mutation_rate,
                self.config.mutation_scale,
                &mut self.rng,
            )?;
            next.push(Individual::new(child));
        }

        log::debug!(
            "generation {} -> {}: kept {} elites, bred {} offspring",
            self.generation,
            self.generation + 1,
            elite_count,
            size - elite_count
        );

        let mut next = Population::from_individuals(next);
        next.reset_fitness();
        self.population = next;
        self.generation += 1;
        self.state = DriverState::AwaitingEvaluation;
        Ok(())
    }

    /// Evolves until `stop` returns `true` for a generation's statistics or
    /// `max_generations` generations have been evaluated.
    ///
    /// The population left behind is the last one evaluated, with its scores
    /// intact, so [`best`](Self::best) returns the final champion.
    pub fn run<E, S>(
        &mut self,
        evaluator: &E,
        max_generations: usize,
        mut stop: S,
    ) -> Result<RunSummary>
    where
        E: FitnessEvaluator<M>,
        S: FnMut(&GenerationStats) -> bool,
    {
        if max_generations == 0 {
            return Err(NeuroError::InvalidConfiguration(
                "max_generations must be at least 1".into(),
            ));
        }

        let mut history = Vec::with_capacity(max_generations);
        let mut stopped_early = false;
        for remaining in (0..max_generations).rev() {
            let stats = match self.state {
                DriverState::AwaitingEvaluation => self.evaluate(evaluator),
                DriverState::Evaluated => self.population.stats(self.generation),
            };
            history.push(stats);
            if stop(&stats) {
                stopped_early = true;
                break;
            }
            if remaining > 0 {
                self.advance_generation()?;
            }
        }

        let best = history
            .iter()
            .copied()
            .reduce(|best, s| if s.best_fitness > best.best_fitness { s } else { best })
            .unwrap_or_else(|| self.population.stats(self.generation));
        log::info!(
            "run finished after {} generation(s): best {:.4} at generation {}{}",
            history.len(),
            best.best_fitness,
            best.generation,
            if stopped_early { " (stop condition met)" } else { "" }
        );
        Ok(RunSummary {
            generations: history.len(),
            best,
            history,
            stopped_early,
        })
    }
}

impl Neuroevolution<FeedForwardNetwork> {
    /// Creates a driver over `config.population_size` randomly initialized
    /// networks, all drawn from the driver's own seeded generator.
    pub fn from_architecture(
        architecture: Architecture,
        activation: Activation,
        config: EvolutionConfig,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let mut rng = Pcg64::seed_from_u64(seed);
        let initial = (0..config.population_size)
            .map(|_| FeedForwardNetwork::random(architecture.clone(), activation, &mut rng))
            .collect();
        let mut engine = Self::new(initial, config, seed)?;
        engine.rng = rng;
        Ok(engine)
    }
}

impl<M: ParameterizedModel> Evolver<M> for Neuroevolution<M> {
    fn step<E: FitnessEvaluator<M>>(&mut self, evaluator: &E) -> Result<GenerationStats> {
        let stats = self.evaluate(evaluator);
        self.advance_generation()?;
        Ok(stats)
    }

    fn population(&self) -> &[Individual<M>] {
        self.population.individuals()
    }
}
