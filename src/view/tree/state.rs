use super::node::Key;

/// Who owns a key list: the host (controlled) or the widget (uncontrolled)
///
/// The owner is chosen once, when the widget is built, and never changes for
/// the lifetime of the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyState {
    /// Host-supplied keys are authoritative; the widget never writes them
    Host(Vec<Key>),
    /// The widget owns and mutates the keys
    Local(Vec<Key>),
}

impl KeyState {
    /// Pick the owner from whether the host supplied a controlled value
    pub fn from_props(controlled: Option<Vec<Key>>, initial: impl FnOnce() -> Vec<Key>) -> Self {
        match controlled {
            Some(keys) => KeyState::Host(keys),
            None => KeyState::Local(initial()),
        }
    }

    pub fn keys(&self) -> &[Key] {
        match self {
            KeyState::Host(keys) | KeyState::Local(keys) => keys,
        }
    }

    pub fn is_host_owned(&self) -> bool {
        matches!(self, KeyState::Host(_))
    }

    /// Apply a widget-originated update
    ///
    /// Returns false (and leaves the keys untouched) when the host owns them.
    pub fn apply_local(&mut self, keys: Vec<Key>) -> bool {
        match self {
            KeyState::Host(_) => false,
            KeyState::Local(current) => {
                *current = keys;
                true
            }
        }
    }

    /// Apply a host re-render with new controlled keys
    ///
    /// Returns false when the widget owns the keys; the host can't take over
    /// ownership after construction.
    pub fn apply_host(&mut self, keys: Vec<Key>) -> bool {
        match self {
            KeyState::Host(current) => {
                *current = keys;
                true
            }
            KeyState::Local(_) => false,
        }
    }
}

/// A partial update produced by a gesture
///
/// Only the concerns the widget owns are written when the update is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    pub selected_keys: Option<Vec<Key>>,
    pub expanded_keys: Option<Vec<Key>>,
}
