//! Error types for profiling

use thiserror::Error;

/// Profiling errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// Chroma vector does not have one bin per pitch class
    #[error("Chroma vector must have 12 bins, got {0}")]
    InvalidChroma(usize),

    /// Chroma vector carries no tonal information (silent or flat)
    #[error("Chroma vector has no tonal content")]
    EmptyChroma,
}

/// Result type for profiling operations
pub type Result<T> = std::result::Result<T, ProfileError>;
