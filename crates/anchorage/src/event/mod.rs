//! Input events delivered to controllers.

/// Keyboard primitives.
pub mod key;

pub use key::{Key, KeyCode, KeyEvent, Mods};
