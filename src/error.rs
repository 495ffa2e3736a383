use thiserror::Error;

/// Rejected simulation input.
///
/// Every randomness-driven outcome is a valid result; the only failure mode is
/// a configuration (or caller-supplied permutation) that violates the game's
/// constraints, detected before any trial runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// N must be at least 1.
    #[error("number of prisoners must be at least 1")]
    NoPrisoners,
    /// N is too large for the success-count encoding.
    #[error("number of prisoners {n} exceeds the supported maximum {max}")]
    TooManyPrisoners { n: usize, max: usize },
    /// A prisoner cannot open more boxes than exist.
    #[error("max_opens {max_opens} exceeds the number of boxes {n}")]
    MaxOpensExceedsBoxes { max_opens: usize, n: usize },
    /// At least one trial must run.
    #[error("number of trials must be at least 1")]
    NoTrials,
    /// Box contents are not a bijection on 1..=N.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
    /// Strategy name not recognised.
    #[error("unknown strategy '{0}' (expected 'random' or 'cycle')")]
    UnknownStrategy(String),
}

/// A type alias for `Result<T, ConfigurationError>`.
pub type Result<T> = std::result::Result<T, ConfigurationError>;
