//! Headless behavior for anchored popup surfaces: menus, selects and
//! anything else that opens a floating list next to a trigger.
//!
//! The crate works against an in-process element tree ([`dom::Document`])
//! and a host [`Context`]. It provides:
//!
//! - [`SurfacePositionController`]: places a surface against an anchor by
//!   corner, flipping an axis when the mirrored placement overflows less.
//! - [`ListNavigationController`]: arrow-key navigation with a single tab
//!   stop.
//! - [`TypeaheadController`]: jump to items by typing their prefix.
//! - [`AttachableController`]: find the control a host belongs to.
//!
//! Transitions and timers are deadline-based; hosts poll them with the
//! current time.

mod context;
pub mod controllers;
pub mod dom;
pub mod error;
pub mod event;
pub use geom;
/// Deadline heap.
pub mod timers;
pub mod transition;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::Context;
pub use controllers::{
    AttachableController, Corner, Edge, ListNavigationController, PositionProperties, Positioning,
    RepositionStrategy, SurfacePositionController, SurfaceStyles, TypeaheadController,
};
pub use dom::{Document, ElementId};
pub use error::{Error, Result};
pub use event::{Key, KeyCode, KeyEvent};
pub use geom::{Expanse, Point, Rect};
pub use timers::Timers;
pub use transition::{AbortController, AbortSignal, Transition, TransitionKind, TransitionOutcome};
