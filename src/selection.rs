//! Parent selection: deterministic elitism followed by fitness-proportional
//! (roulette wheel) sampling.
//!
//! Selection works on scores only and returns population indices, so the
//! caller decides how parents are materialized.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use std::cmp::Ordering;

/// Compare two f32 values, treating NaN as less than all other values.
/// This ensures NaN fitness individuals sort to the end (lowest priority).
pub(crate) fn cmp_f32_nan_last(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Population indices ordered by score, best first.
///
/// The sort is stable, so equal scores keep their original index order.
pub fn rank_by_fitness(scores: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| cmp_f32_nan_last(scores[b], scores[a]));
    order
}

/// `floor(population_size * elite_fraction)`, clamped to the population size.
///
/// The product is taken in `f32`, the precision the fraction was given in,
/// so decimal fractions such as `0.7` floor to the count they read as.
pub fn elite_count(population_size: usize, elite_fraction: f32) -> usize {
    let raw = (population_size as f32 * elite_fraction).floor();
    if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        (raw as usize).min(population_size)
    }
}

/// Selects `scores.len()` parents.
///
/// The first `elite_count` entries are the top-ranked individuals in rank
/// order. The rest are sampled with replacement from the whole population
/// with probability `score / sum(scores)`.
///
/// Negative and NaN scores are clamped to zero weight before the sum is
/// taken, so the uniform fallback applies only when no score is positive.
/// A mixed list such as `[-3.0, 1.0]` therefore always samples index 1,
/// even though its raw sum is negative.
pub fn select_parents<R: Rng>(scores: &[f32], elite_fraction: f32, rng: &mut R) -> Vec<usize> {
    let n = scores.len();
    if n == 0 {
        return Vec::new();
    }

    let elites = elite_count(n, elite_fraction);
    let mut parents = Vec::with_capacity(n);
    parents.extend(rank_by_fitness(scores).into_iter().take(elites));

    let remaining = n - elites;
    if remaining == 0 {
        return parents;
    }

    let wheel = RouletteWheel::new(scores);
    parents.extend((0..remaining).map(|_| wheel.spin(rng)));
    log::trace!("selected parents {:?} ({} elites)", parents, elites);
    parents
}

/// Fitness-proportional sampler with a uniform fallback for degenerate
/// score distributions.
enum RouletteWheel {
    Weighted(WeightedIndex<f64>),
    Uniform(usize),
}

impl RouletteWheel {
    fn new(scores: &[f32]) -> Self {
        let weights: Vec<f64> = scores
            .iter()
            .map(|&s| if s.is_nan() || s < 0.0 { 0.0 } else { s as f64 })
            .collect();
        let total: f64 = weights.iter().sum();

        if total > 0.0 && total.is_finite() {
            if let Ok(index) = WeightedIndex::new(&weights) {
                return RouletteWheel::Weighted(index);
            }
        }
        log::warn!(
            "degenerate fitness distribution (weight total {}); falling back to uniform selection",
            total
        );
        RouletteWheel::Uniform(scores.len())
    }

    fn spin<R: Rng>(&self, rng: &mut R) -> usize {
        match self {
            RouletteWheel::Weighted(index) => index.sample(rng),
            RouletteWheel::Uniform(n) => rng.random_range(0..*n),
        }
    }
}
