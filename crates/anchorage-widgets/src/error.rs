//! Widget errors.

use std::result::Result as StdResult;

use thiserror::Error;

/// Errors emitted by the widgets.
#[derive(Debug, Error)]
pub enum Error {
    /// A document or controller operation failed.
    #[error(transparent)]
    Core(#[from] anchorage::Error),
    /// Widget options could not be loaded.
    #[error("options: {0}")]
    Options(#[from] serde_json::Error),
    /// No option carries the requested value.
    #[error("no option with value {0:?}")]
    NoSuchOption(String),
    /// An option index past the end of the list.
    #[error("option index {0} out of range")]
    OutOfRange(usize),
}

/// Result type for the widgets.
pub type Result<T> = StdResult<T, Error>;
