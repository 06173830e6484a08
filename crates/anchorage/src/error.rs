use std::result::Result as StdResult;

use thiserror::Error;

use crate::{dom::ElementId, geom};

/// Result type for anchorage operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
    #[error("invalid: {0}")]
    /// Invalid input, such as an unparseable corner.
    Invalid(String),
    #[error("directive: {0}")]
    /// A binding was applied to the wrong kind of attribute.
    Directive(String),
    #[error("no such element: {0:?}")]
    /// An element id that is not (or no longer) in the document.
    NoSuchElement(ElementId),
    #[error("hierarchy: {0}")]
    /// A tree operation would create a cycle or move the document root.
    Hierarchy(String),
    #[error("popover: {0}")]
    /// Popover operation on an element that cannot host one.
    Popover(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}
