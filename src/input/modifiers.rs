//! Modifier keys held during a click or key gesture
//!
//! A directory click with ctrl/cmd or shift is a selection gesture, never an
//! expansion gesture.

use crossterm::event::KeyModifiers;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    /// Cmd on macOS, Super/Windows elsewhere
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    /// Ctrl on Windows/Linux or Cmd on macOS
    pub fn is_ctrl_pick(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn is_shift_pick(&self) -> bool {
        self.shift
    }

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(modifiers: KeyModifiers) -> Self {
        Self {
            shift: modifiers.contains(KeyModifiers::SHIFT),
            ctrl: modifiers.contains(KeyModifiers::CONTROL),
            meta: modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META),
        }
    }
}
