use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElasticNetError>;

#[derive(Debug, Clone, Error)]
pub enum ElasticNetError {
    #[error("penalty must be non-negative, got {0}")]
    InvalidPenalty(f64),
    #[error("l1 ratio must lie in [0, 1], got {0}")]
    InvalidL1Ratio(f64),
    #[error("tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    #[error("at least one iteration is required")]
    NoIterations,
    /// The input has no samples to fit on
    #[error("not enough samples to fit a model")]
    NotEnoughSamples,
}
