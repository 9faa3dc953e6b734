//! # Symbios Neuroevolution
//!
//! Evolves the weights and biases of small feed-forward networks with a
//! generational genetic algorithm instead of gradient descent.
//!
//! The optimizer only ever sees a model through its flat parameter vector
//! ([`ParameterizedModel`]), and a problem only through its fitness score
//! ([`FitnessEvaluator`]), so any black-box objective can be optimized.
//!
//! ## Quick Start
//!
//! ```rust
//! use symbios_neuroevolution::{
//!     EvolutionConfig, ParameterizedModel, algorithms::generational::Neuroevolution,
//!     network::{Activation, Architecture, FeedForwardNetwork},
//! };
//!
//! let config = EvolutionConfig::default()
//!     .with_population_size(20)
//!     .with_elite_fraction(0.1);
//! let architecture = Architecture::new(vec![2, 3, 1]).unwrap();
//! let mut engine =
//!     Neuroevolution::from_architecture(architecture, Activation::Sigmoid, config, 42).unwrap();
//!
//! // Reward outputs close to 1.0 for the input [1, 1].
//! let fitness = |net: &FeedForwardNetwork| 1.0 - (1.0 - net.evaluate(&[1.0, 1.0])[0]).abs();
//!
//! let summary = engine
//!     .run(&fitness, 25, |stats| stats.best_fitness > 0.99)
//!     .unwrap();
//! assert!(summary.generations >= 1);
//! ```
//!
//! ## Generation Cycle
//!
//! 1. Every individual is scored by the caller-supplied evaluator
//! 2. The top `elite_fraction` is carried over unmodified
//! 3. Remaining slots are filled by uniform crossover of fitness-proportionally
//!    sampled parents, followed by per-gene Gaussian mutation
//! 4. The new population replaces the old one and all scores are reset
//!
//! ## Features
//!
//! - `parallel`: evaluate individuals on the `rayon` thread pool. Selection
//!   and reproduction always stay sequential on the seeded generator.

pub mod config;
pub mod error;
pub mod network;
pub mod operators;
pub mod population;
pub mod selection;

pub mod algorithms {
    pub mod generational;
}

pub use config::EvolutionConfig;
pub use error::{NeuroError, Result};
pub use population::{GenerationStats, Individual, Population};

/// A model whose entire learnable state is a fixed-length vector of reals.
///
/// The vector layout is implementation defined but must be identical for
/// every model sharing an architecture.
pub trait ParameterizedModel: Clone + Send + Sync {
    /// Number of entries in the parameter vector.
    fn parameter_count(&self) -> usize;

    /// Returns a flattened copy of all parameters.
    fn parameters(&self) -> Vec<f32>;

    /// Overwrites all parameters positionally.
    ///
    /// # Errors
    ///
    /// Returns [`NeuroError::ShapeMismatch`] when `params.len()` differs from
    /// [`parameter_count`](Self::parameter_count). The model is left unchanged.
    fn set_parameters(&mut self, params: &[f32]) -> Result<()>;

    /// Pure forward evaluation under the current parameters.
    fn evaluate(&self, input: &[f32]) -> Vec<f32>;
}

/// Scores a model. Higher is better.
///
/// Implementations must be pure: the same model always receives the same
/// score, and evaluating one model never affects another.
pub trait FitnessEvaluator<M>: Send + Sync {
    fn evaluate(&self, model: &M) -> f32;
}

impl<M, F> FitnessEvaluator<M> for F
where
    F: Fn(&M) -> f32 + Send + Sync,
{
    fn evaluate(&self, model: &M) -> f32 {
        self(model)
    }
}

/// The master engine trait.
pub trait Evolver<M: ParameterizedModel> {
    /// Scores the current population, then breeds its successor.
    ///
    /// Returns the statistics of the population that was scored.
    fn step<E: FitnessEvaluator<M>>(&mut self, evaluator: &E) -> Result<GenerationStats>;

    fn population(&self) -> &[Individual<M>];
}
