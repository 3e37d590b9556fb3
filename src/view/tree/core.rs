use super::entities::KeyEntities;
use super::node::Key;
use std::collections::HashSet;

/// A row of the flattened, visible tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNode {
    pub key: Key,
    /// Indent level (roots are 0)
    pub level: usize,
    pub is_leaf: bool,
    pub expanded: bool,
    pub selected: bool,
    pub loading: bool,
    pub disabled: bool,
}

/// Low-level tree renderer state
///
/// Holds the keys currently rendered as selected/expanded, the cursor and
/// the virtual window. It computes toggled key sets for gestures but does not
/// decide who owns the resulting state; owners feed the final keys back with
/// `set_selected_keys` / `set_expanded_keys`.
#[derive(Debug, Clone)]
pub struct TreeCore {
    selected_keys: Vec<Key>,
    expanded_keys: Vec<Key>,
    /// Nodes whose children are being loaded
    loading_keys: HashSet<Key>,
    /// Focused row
    cursor: Option<Key>,
    /// Scroll offset (index into visible nodes)
    scroll_offset: usize,
    /// Rows per item
    item_height: usize,
    /// Render only the window instead of every row
    virtual_list: bool,
    /// Last known viewport height in rows (for scrolling calculations)
    pub(crate) viewport_height: usize,
}

impl TreeCore {
    pub fn new(item_height: usize, virtual_list: bool) -> Self {
        Self {
            selected_keys: Vec::new(),
            expanded_keys: Vec::new(),
            loading_keys: HashSet::new(),
            cursor: None,
            scroll_offset: 0,
            item_height: item_height.max(1),
            virtual_list,
            viewport_height: 10, // Default, will be updated during rendering
        }
    }

    pub fn selected_keys(&self) -> &[Key] {
        &self.selected_keys
    }

    pub fn expanded_keys(&self) -> &[Key] {
        &self.expanded_keys
    }

    pub fn set_selected_keys(&mut self, keys: Vec<Key>) {
        self.selected_keys = keys;
    }

    pub fn set_expanded_keys(&mut self, keys: Vec<Key>) {
        self.expanded_keys = keys;
    }

    pub fn is_selected(&self, key: &Key) -> bool {
        self.selected_keys.contains(key)
    }

    pub fn is_expanded(&self, key: &Key) -> bool {
        self.expanded_keys.contains(key)
    }

    pub fn set_loading(&mut self, key: Key, loading: bool) {
        if loading {
            self.loading_keys.insert(key);
        } else {
            self.loading_keys.remove(&key);
        }
    }

    pub fn item_height(&self) -> usize {
        self.item_height
    }

    pub fn is_virtual(&self) -> bool {
        self.virtual_list
    }

    /// Keys the node-select gesture produces for `key`
    ///
    /// Multiple mode adds or removes the key; single mode selects just the
    /// key or clears the selection if it was already selected. Returns the
    /// keys and whether `key` ends up selected.
    pub fn toggle_select(&self, key: &Key, multiple: bool) -> (Vec<Key>, bool) {
        let was_selected = self.is_selected(key);
        let keys = match (multiple, was_selected) {
            (true, true) => self
                .selected_keys
                .iter()
                .filter(|k| *k != key)
                .cloned()
                .collect(),
            (true, false) => {
                let mut keys = self.selected_keys.clone();
                keys.push(key.clone());
                keys
            }
            (false, true) => Vec::new(),
            (false, false) => vec![key.clone()],
        };
        (keys, !was_selected)
    }

    /// Keys the node-expand gesture produces for `key`, and whether it ends up expanded
    pub fn toggle_expand(&self, key: &Key) -> (Vec<Key>, bool) {
        if self.is_expanded(key) {
            let keys = self
                .expanded_keys
                .iter()
                .filter(|k| *k != key)
                .cloned()
                .collect();
            (keys, false)
        } else {
            let mut keys = self.expanded_keys.clone();
            keys.push(key.clone());
            (keys, true)
        }
    }

    /// Flatten the visible nodes in display order
    pub fn display_nodes(&self, entities: &KeyEntities) -> Vec<DisplayNode> {
        entities
            .visible_keys(&self.expanded_keys)
            .into_iter()
            .filter_map(|(key, level)| {
                let entity = entities.get(&key)?;
                Some(DisplayNode {
                    level,
                    is_leaf: entity.is_leaf,
                    expanded: self.is_expanded(&key),
                    selected: self.is_selected(&key),
                    loading: self.loading_keys.contains(&key),
                    disabled: entity.disabled,
                    key,
                })
            })
            .collect()
    }

    /// Visible keys in display order
    pub fn visible_order(&self, entities: &KeyEntities) -> Vec<Key> {
        entities
            .visible_keys(&self.expanded_keys)
            .into_iter()
            .map(|(key, _)| key)
            .collect()
    }

    /// Set the viewport height in rows (should be called during rendering)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
    }

    /// Number of items that fit in the viewport
    pub fn items_per_page(&self) -> usize {
        self.viewport_height / self.item_height
    }

    pub fn cursor(&self) -> Option<&Key> {
        self.cursor.as_ref()
    }

    pub fn set_cursor(&mut self, key: Option<Key>) {
        self.cursor = key;
    }

    pub fn get_scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset;
    }

    /// Move the cursor to the next visible node
    pub fn cursor_next(&mut self, entities: &KeyEntities) {
        self.move_cursor(entities, |pos, len| (pos + 1).min(len - 1));
    }

    /// Move the cursor to the previous visible node
    pub fn cursor_prev(&mut self, entities: &KeyEntities) {
        self.move_cursor(entities, |pos, _| pos.saturating_sub(1));
    }

    fn move_cursor(&mut self, entities: &KeyEntities, step: impl Fn(usize, usize) -> usize) {
        let visible = self.visible_order(entities);
        if visible.is_empty() {
            self.cursor = None;
            return;
        }

        let next = match self
            .cursor
            .as_ref()
            .and_then(|current| visible.iter().position(|k| k == current))
        {
            Some(pos) => step(pos, visible.len()),
            None => 0,
        };
        self.cursor = Some(visible[next].clone());
        self.ensure_visible(next);
    }

    /// Adjust the scroll offset so the item at `index` is inside the viewport
    ///
    /// Only scrolls once the index goes past the viewport edges.
    pub fn ensure_visible(&mut self, index: usize) {
        let page = self.items_per_page();
        if page == 0 {
            return;
        }

        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if index >= self.scroll_offset + page {
            self.scroll_offset = index + 1 - page;
        }
    }

    /// Largest offset that still fills the viewport
    fn max_scroll_offset(&self, total: usize) -> usize {
        total.saturating_sub(self.items_per_page())
    }

    /// Pull the scroll offset back after the tree shrank under it
    pub fn clamp_scroll(&mut self, total: usize) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset(total));
    }

    /// Range of display indices to render
    ///
    /// A virtual list yields one page from the scroll offset. Otherwise every
    /// row from the offset on is handed to the list, which clips it to the
    /// area. The offset is clamped so the last page stays full.
    pub fn visible_window(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.scroll_offset.min(self.max_scroll_offset(total));
        if !self.virtual_list {
            return start..total;
        }
        let end = (start + self.items_per_page()).min(total);
        start..end
    }

    /// Display index under a viewport row, for mouse hit testing
    pub fn index_at_row(&self, row: usize, total: usize) -> Option<usize> {
        let window = self.visible_window(total);
        let index = window.start + row / self.item_height;
        window.contains(&index).then_some(index)
    }
}
