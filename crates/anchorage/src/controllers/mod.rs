//! The behavior controllers a popup widget is assembled from.

/// Binding a host to its control.
pub mod attachable;
/// Anchor and surface corners.
pub mod corner;
/// Single-tab-stop list navigation.
pub mod list;
/// Surface positioning.
pub mod position;
/// Buffered prefix search.
pub mod typeahead;

pub use attachable::{AttachableController, AttachableHosts, ControlChange, deliver_for_mutations};
pub use corner::{Corner, Edge};
pub use list::{ItemRecord, ListNavigationController};
pub use position::{
    Placement, PositionChange, PositionProperties, Positioning, RepositionStrategy, SurfacePositionController,
    SurfaceStyles,
};
pub use typeahead::{DEFAULT_TYPEAHEAD_DELAY, TypeaheadController, TypeaheadRecord};
