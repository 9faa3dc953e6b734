use thiserror::Error;

/// Errors surfaced by the optimizer and its collaborators.
///
/// An all-non-positive fitness distribution is deliberately absent: selection
/// falls back to uniform sampling instead of failing.
#[derive(Debug, Error)]
pub enum NeuroError {
    #[error("parameter vector has length {actual}, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid architecture: {0}")]
    InvalidArchitecture(String),

    #[error("received {actual} fitness scores for a population of {expected}")]
    ScoreCountMismatch { expected: usize, actual: usize },

    #[error("generation {generation} has not been evaluated")]
    NotEvaluated { generation: usize },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, NeuroError>;
