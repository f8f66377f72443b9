use thiserror::Error;

/// Errors returned by the classifier. All of them are precondition failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnnError {
    /// `k` is zero or larger than the training set.
    #[error("invalid k: requested {k}, but the training set has {n} points")]
    InvalidK {
        /// Requested neighbor count.
        k: usize,
        /// Number of points in the training set.
        n: usize,
    },

    /// The classifier was built without any labeled points.
    #[error("empty training set")]
    EmptyTrainingSet,

    /// A coordinate is NaN or infinite.
    #[error("malformed point ({x}, {y}): coordinates must be finite")]
    MalformedPoint { x: f64, y: f64 },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, KnnError>;

/// Errors raised while loading a scenario file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid scenario: {0}")]
    Invalid(#[from] KnnError),
}
