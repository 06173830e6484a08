//! Keydown events as controllers see them.
use std::{fmt, ops::BitOr};

/// Modifier keys held during a keystroke.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
    /// Alt or Option.
    pub alt: bool,
    /// Meta, Command or Windows.
    pub meta: bool,
}

impl Mods {
    /// Nothing held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
    /// Shift alone.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    /// Control alone.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    /// Alt alone.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
    /// Meta alone.
    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Is a modifier held that turns a character into a shortcut?
    pub fn is_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }

    /// Attach these modifiers to a key.
    pub fn key(self, code: impl Into<KeyCode>) -> Key {
        Key {
            mods: self,
            key: code.into(),
        }
    }
}

impl BitOr for Mods {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
            meta: self.meta || other.meta,
        }
    }
}

/// Logical key values.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum KeyCode {
    /// `Enter`
    Enter,
    /// `Escape`
    Esc,
    /// `Tab`
    Tab,
    /// `Backspace`
    Backspace,
    /// `ArrowLeft`
    Left,
    /// `ArrowRight`
    Right,
    /// `ArrowUp`
    Up,
    /// `ArrowDown`
    Down,
    /// `Home`
    Home,
    /// `End`
    End,
    /// `PageUp`
    PageUp,
    /// `PageDown`
    PageDown,
    /// A character, including `' '` for the space bar.
    Char(char),
}

impl KeyCode {
    /// Is this one of the four arrow keys?
    pub fn is_arrow(&self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Up | Self::Down)
    }
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enter => "Enter",
            Self::Esc => "Escape",
            Self::Tab => "Tab",
            Self::Backspace => "Backspace",
            Self::Left => "ArrowLeft",
            Self::Right => "ArrowRight",
            Self::Up => "ArrowUp",
            Self::Down => "ArrowDown",
            Self::Home => "Home",
            Self::End => "End",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::Char(c) => return write!(f, "{c}"),
        };
        f.write_str(name)
    }
}

/// A key with the modifiers held when it was pressed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifiers.
    pub mods: Mods,
    /// The key.
    pub key: KeyCode,
}

impl Key {
    /// The character this key types, if any. Shifted characters count;
    /// command chords and control characters do not.
    pub fn printable(&self) -> Option<char> {
        match self.key {
            KeyCode::Char(c) if !self.mods.is_command() && !c.is_control() => Some(c),
            _ => None,
        }
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Mods::NONE.key(code)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Mods::NONE.key(c)
    }
}

/// A keydown event as seen by a controller. Handlers that consume the key
/// call [`KeyEvent::prevent_default`]; later handlers skip prevented events.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Set once a handler has consumed the event.
    default_prevented: bool,
}

impl KeyEvent {
    /// An event nobody has handled yet.
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            default_prevented: false,
        }
    }

    /// Mark the event as consumed.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Has a handler consumed this event?
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// The key, without modifiers.
    pub fn code(&self) -> KeyCode {
        self.key.key
    }

    /// Is this the space bar?
    pub fn is_space(&self) -> bool {
        self.key.key == KeyCode::Char(' ')
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn modifiers_combine() {
        assert_eq!(
            Mods::SHIFT | Mods::ALT,
            Mods {
                shift: true,
                alt: true,
                ..Mods::NONE
            }
        );
        assert!(!Mods::SHIFT.is_command());
        assert!(Mods::META.is_command());
        assert_eq!(Key::from('a'), Mods::NONE.key('a'));
    }

    #[test]
    fn printable() {
        assert_eq!(Key::from('s').printable(), Some('s'));
        assert_eq!(Mods::SHIFT.key('S').printable(), Some('S'));
        assert_eq!(Mods::CTRL.key('s').printable(), None);
        assert_eq!(Mods::META.key('s').printable(), None);
        assert_eq!(Key::from(KeyCode::Enter).printable(), None);
        assert_eq!(Key::from('\u{7}').printable(), None);
    }

    #[test]
    fn prevent_default() {
        let mut e = KeyEvent::new(KeyCode::Down);
        assert!(!e.default_prevented());
        e.prevent_default();
        assert!(e.default_prevented());
        assert!(e.code().is_arrow());
        assert!(KeyEvent::new(' ').is_space());
        assert_eq!(KeyCode::Down.to_string(), "ArrowDown");
    }
}
