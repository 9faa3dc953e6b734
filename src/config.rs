//! Optimizer configuration.
//!
//! [`EvolutionConfig`] can be built in code with the `with_*` setters or
//! loaded from a TOML document:
//!
//! ```rust
//! use symbios_neuroevolution::EvolutionConfig;
//!
//! let config = EvolutionConfig::from_toml_str(
//!     r#"
//!     population_size = 100
//!     mutation_rate = 0.05
//!     mutation_scale = 0.3
//!     elite_fraction = 0.2
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.elite_count(), 20);
//! ```

use crate::error::{NeuroError, Result};
use serde::{Deserialize, Serialize};

/// Recognized optimizer options.
///
/// Missing keys take their [`Default`] values when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionConfig {
    /// Number of individuals, constant across the run. Must be >= 1.
    pub population_size: usize,
    /// Per-gene mutation probability in `[0.0, 1.0]`.
    pub mutation_rate: f32,
    /// Standard deviation of the Gaussian mutation noise. Must be >= 0.
    pub mutation_scale: f32,
    /// Fraction of the population carried over unmodified, in `[0.0, 1.0]`.
    pub elite_fraction: f32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            mutation_rate: 0.1,
            mutation_scale: 0.5,
            elite_fraction: 0.1,
        }
    }
}

impl EvolutionConfig {
    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    pub fn with_mutation_rate(mut self, mutation_rate: f32) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    pub fn with_mutation_scale(mut self, mutation_scale: f32) -> Self {
        self.mutation_scale = mutation_scale;
        self
    }

    pub fn with_elite_fraction(mut self, elite_fraction: f32) -> Self {
        self.elite_fraction = elite_fraction;
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects option values no generation could run with.
    ///
    /// # Errors
    ///
    /// Returns [`NeuroError::InvalidConfiguration`] naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 1 {
            return Err(NeuroError::InvalidConfiguration(
                "population_size must be at least 1".into(),
            ));
        }
        check_unit_interval("mutation_rate", self.mutation_rate)?;
        check_unit_interval("elite_fraction", self.elite_fraction)?;
        if !self.mutation_scale.is_finite() || self.mutation_scale < 0.0 {
            return Err(NeuroError::InvalidConfiguration(format!(
                "mutation_scale must be finite and non-negative, got {}",
                self.mutation_scale
            )));
        }
        if self.elite_count() == self.population_size {
            log::warn!(
                "elite_count equals population_size ({}); no offspring will be produced",
                self.population_size
            );
        }
        Ok(())
    }

    /// Number of individuals preserved per generation:
    /// `floor(population_size * elite_fraction)`.
    pub fn elite_count(&self) -> usize {
        crate::selection::elite_count(self.population_size, self.elite_fraction)
    }
}

pub(crate) fn check_unit_interval(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(NeuroError::InvalidConfiguration(format!(
            "{name} must be in [0, 1], got {value}"
        )))
    }
}
