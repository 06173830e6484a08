use std::result::Result as StdResult;

use thiserror::Error;

/// Invalid geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A coordinate or dimension is NaN or infinite.
    #[error("non-finite rect: {0}")]
    NonFinite(String),
    /// A width or height below zero.
    #[error("negative size {w}x{h}")]
    NegativeSize {
        /// Width.
        w: f64,
        /// Height.
        h: f64,
    },
}

/// Result type for geometry operations.
pub type Result<T> = StdResult<T, Error>;
