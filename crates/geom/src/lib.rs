//! Pixel geometry primitives used across anchorage.

/// Error types for geometry operations.
mod error;
/// Width/height size type.
mod expanse;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use error::{Error, Result};
pub use expanse::Expanse;
pub use point::Point;
pub use rect::Rect;

/// Layout axes.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Axis {
    /// The block (vertical) axis.
    Block,
    /// The inline (horizontal) axis.
    Inline,
}
