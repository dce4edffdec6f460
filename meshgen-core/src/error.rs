//! Error types for meshgen

use thiserror::Error;

/// Main error type for meshgen operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Fewer than three distinct, finite points were supplied
    #[error("Insufficient points: need at least 3 distinct points, found {found}")]
    InsufficientPoints { found: usize },

    /// Every point is collinear or coincident, no seed triangle exists
    #[error("Degenerate input: no valid seed triangle (points are collinear or coincident)")]
    DegenerateSeed,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Manifold violation: {0}")]
    ManifoldViolation(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

/// Result type alias for meshgen operations
pub type Result<T> = std::result::Result<T, Error>;
