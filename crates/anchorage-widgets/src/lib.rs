//! Menu and select widgets on top of the `anchorage` controllers.

pub mod error;
mod item;
pub mod menu;
pub mod select;

pub use error::{Error, Result};
pub use item::{ItemKind, MenuItem};
pub use menu::{CloseReason, FocusState, Menu, MenuEvent, MenuOptions};
pub use select::{Select, SelectEvent, SelectOptions};
