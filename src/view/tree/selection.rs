use super::node::Key;
use crate::input::Modifiers;
use std::collections::HashSet;

/// Anchor kept across clicks to support shift-range extension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionAnchor {
    /// Key of the last plain or ctrl click
    pub last_selected: Option<Key>,
    /// Selection as it was after that click
    pub cached: Vec<Key>,
}

/// Which rule produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Plain click (or modifiers with multi-select disabled)
    Single,
    /// Ctrl/Cmd click
    Toggle,
    /// Shift click
    Range,
}

/// Everything a directory click needs to compute the next selection
#[derive(Debug, Clone, Copy)]
pub struct SelectionInput<'a> {
    pub clicked: &'a Key,
    pub modifiers: Modifiers,
    /// Multi-select enabled
    pub multiple: bool,
    pub anchor: &'a SelectionAnchor,
    /// Keys produced by the renderer's own select toggle for `clicked`
    pub toggled: &'a [Key],
    /// Visible keys in display order
    pub visible: &'a [Key],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub keys: Vec<Key>,
    pub anchor: SelectionAnchor,
    pub mode: SelectMode,
}

/// Compute the selection a directory click produces
///
/// Ctrl takes precedence over shift when both are held.
pub fn resolve_selection(input: SelectionInput<'_>) -> SelectionOutcome {
    let SelectionInput {
        clicked,
        modifiers,
        multiple,
        anchor,
        toggled,
        visible,
    } = input;

    if multiple && modifiers.is_ctrl_pick() {
        let keys = toggled.to_vec();
        return SelectionOutcome {
            anchor: SelectionAnchor {
                last_selected: Some(clicked.clone()),
                cached: keys.clone(),
            },
            keys,
            mode: SelectMode::Toggle,
        };
    }

    if multiple && modifiers.is_shift_pick() {
        let range = range_in_order(visible, Some(clicked), anchor.last_selected.as_ref());
        let keys = union(&anchor.cached, &range);
        return SelectionOutcome {
            keys,
            // The anchor stays where the range started
            anchor: anchor.clone(),
            mode: SelectMode::Range,
        };
    }

    let keys = vec![clicked.clone()];
    SelectionOutcome {
        anchor: SelectionAnchor {
            last_selected: Some(clicked.clone()),
            cached: keys.clone(),
        },
        keys,
        mode: SelectMode::Single,
    }
}

/// Contiguous inclusive range between two keys of an ordered list
///
/// Empty when either endpoint is absent.
pub fn range_in_order(order: &[Key], start: Option<&Key>, end: Option<&Key>) -> Vec<Key> {
    let (Some(start), Some(end)) = (start, end) else {
        return Vec::new();
    };
    let position = |target: &Key| order.iter().position(|k| k == target);
    let (Some(a), Some(b)) = (position(start), position(end)) else {
        return Vec::new();
    };
    let (from, to) = if a <= b { (a, b) } else { (b, a) };
    order[from..=to].to_vec()
}

/// Ordered union without duplicates, `first` keys first
fn union(first: &[Key], second: &[Key]) -> Vec<Key> {
    let mut seen = HashSet::new();
    first
        .iter()
        .chain(second)
        .filter(|k| seen.insert(*k))
        .cloned()
        .collect()
}
