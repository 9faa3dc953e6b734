//! Genetic operators over flat parameter vectors.
//!
//! The vector-level functions do the work; [`crossover`] and [`mutate`] lift
//! them onto any [`ParameterizedModel`] through its get/set parameter
//! interface.

use crate::ParameterizedModel;
use crate::config::check_unit_interval;
use crate::error::{NeuroError, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Per-gene uniform crossover.
///
/// Each position is copied from `parent1` or `parent2` on a fair coin flip,
/// so every gene of the child equals one parent's gene exactly.
pub fn uniform_crossover<R: Rng>(
    parent1: &[f32],
    parent2: &[f32],
    rng: &mut R,
) -> Result<Vec<f32>> {
    if parent1.len() != parent2.len() {
        return Err(NeuroError::ShapeMismatch {
            expected: parent1.len(),
            actual: parent2.len(),
        });
    }
    Ok(parent1
        .iter()
        .zip(parent2)
        .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
        .collect())
}

/// Adds `N(0, scale²)` noise to each gene with probability `rate`.
///
/// Returns the number of genes touched. With `rate == 0.0` the slice is
/// left bit-for-bit unchanged.
pub fn gaussian_mutation<R: Rng>(
    genes: &mut [f32],
    rate: f32,
    scale: f32,
    rng: &mut R,
) -> Result<usize> {
    check_unit_interval("mutation_rate", rate)?;
    let noise = Normal::new(0.0_f32, scale).map_err(|e| {
        NeuroError::InvalidConfiguration(format!("mutation_scale {scale} rejected: {e}"))
    })?;

    let mut mutated = 0;
    for gene in genes.iter_mut() {
        if rng.random_bool(rate as f64) {
            *gene += noise.sample(rng);
            mutated += 1;
        }
    }
    Ok(mutated)
}

/// Breeds a child with the same architecture as its parents.
pub fn crossover<M: ParameterizedModel, R: Rng>(
    parent1: &M,
    parent2: &M,
    rng: &mut R,
) -> Result<M> {
    let genes = uniform_crossover(&parent1.parameters(), &parent2.parameters(), rng)?;
    let mut child = parent1.clone();
    child.set_parameters(&genes)?;
    Ok(child)
}

/// Mutates `individual` in place.
pub fn mutate<M: ParameterizedModel, R: Rng>(
    individual: &mut M,
    rate: f32,
    scale: f32,
    rng: &mut R,
) -> Result<()> {
    let mut genes = individual.parameters();
    if gaussian_mutation(&mut genes, rate, scale, rng)? > 0 {
        individual.set_parameters(&genes)?;
    }
    Ok(())
}
