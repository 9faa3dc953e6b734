use crate::ParameterizedModel;
use crate::error::{NeuroError, Result};
use crate::selection::cmp_f32_nan_last;
use serde::{Deserialize, Serialize};

/// Score carried by an individual that has not been evaluated yet.
pub const NEUTRAL_FITNESS: f32 = 0.0;

/// One candidate solution: a model paired with its fitness score.
#[derive(Debug, Clone)]
pub struct Individual<M> {
    pub model: M,
    /// Stale ([`NEUTRAL_FITNESS`]) until the next evaluation pass.
    pub fitness: f32,
}

impl<M> Individual<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            fitness: NEUTRAL_FITNESS,
        }
    }
}

/// Summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f32,
    pub mean_fitness: f32,
    pub worst_fitness: f32,
    /// Position of the best individual within its population.
    pub best_index: usize,
}

/// Fixed-size, ordered collection of individuals sharing one parameter layout.
#[derive(Debug, Clone)]
pub struct Population<M> {
    individuals: Vec<Individual<M>>,
}

impl<M: ParameterizedModel> Population<M> {
    /// # Errors
    ///
    /// - [`NeuroError::InvalidConfiguration`] if `models` is empty
    /// - [`NeuroError::ShapeMismatch`] if the models disagree on parameter count
    pub fn new(models: Vec<M>) -> Result<Self> {
        let Some(first) = models.first() else {
            return Err(NeuroError::InvalidConfiguration(
                "population must contain at least one individual".into(),
            ));
        };
        let expected = first.parameter_count();
        if let Some(odd) = models.iter().find(|m| m.parameter_count() != expected) {
            return Err(NeuroError::ShapeMismatch {
                expected,
                actual: odd.parameter_count(),
            });
        }
        Ok(Self {
            individuals: models.into_iter().map(Individual::new).collect(),
        })
    }

    /// Parameter count shared by every member.
    pub fn parameter_count(&self) -> usize {
        self.individuals[0].model.parameter_count()
    }
}

impl<M> Population<M> {
    pub(crate) fn from_individuals(individuals: Vec<Individual<M>>) -> Self {
        Self { individuals }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual<M>] {
        &self.individuals
    }

    pub fn get(&self, index: usize) -> Option<&Individual<M>> {
        self.individuals.get(index)
    }

    pub fn models(&self) -> impl Iterator<Item = &M> {
        self.individuals.iter().map(|i| &i.model)
    }

    /// Fitness scores in population order.
    pub fn scores(&self) -> Vec<f32> {
        self.individuals.iter().map(|i| i.fitness).collect()
    }

    pub(crate) fn install_scores(&mut self, scores: &[f32]) {
        debug_assert_eq!(scores.len(), self.individuals.len());
        for (ind, &score) in self.individuals.iter_mut().zip(scores) {
            ind.fitness = score;
        }
    }

    pub fn reset_fitness(&mut self) {
        for ind in &mut self.individuals {
            ind.fitness = NEUTRAL_FITNESS;
        }
    }

    /// Highest-scoring individual. NaN scores never win; ties go to the
    /// lowest index.
    pub fn best(&self) -> Option<&Individual<M>> {
        self.best_index().map(|i| &self.individuals[i])
    }

    fn best_index(&self) -> Option<usize> {
        self.individuals
            .iter()
            .enumerate()
            .reduce(|best, cand| {
                if cmp_f32_nan_last(cand.1.fitness, best.1.fitness).is_gt() {
                    cand
                } else {
                    best
                }
            })
            .map(|(i, _)| i)
    }

    pub fn stats(&self, generation: usize) -> GenerationStats {
        let best_index = self.best_index().unwrap_or(0);
        let n = self.individuals.len().max(1) as f32;
        let mean_fitness = self.individuals.iter().map(|i| i.fitness).sum::<f32>() / n;
        let worst_fitness = self
            .individuals
            .iter()
            .map(|i| i.fitness)
            .reduce(f32::min)
            .unwrap_or(NEUTRAL_FITNESS);
        GenerationStats {
            generation,
            best_fitness: self
                .individuals
                .get(best_index)
                .map_or(NEUTRAL_FITNESS, |i| i.fitness),
            mean_fitness,
            worst_fitness,
            best_index,
        }
    }
}
