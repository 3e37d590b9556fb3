use super::entities::KeyEntities;
use super::generic::GenericTree;
use super::icons::directory_icon;
use super::node::{Key, TreeData, TreeNode};
use super::selection::{resolve_selection, SelectMode, SelectionAnchor, SelectionInput};
use super::state::{KeyState, StateUpdate};
use crate::config::{DirectoryTreeConfig, ExpandAction, TreeConfig};
use crate::input::Modifiers;
use crate::services::debounce::{Debouncer, EXPAND_DEBOUNCE};
use crate::services::time_source::{RealTimeSource, SharedTimeSource};
use std::fmt;

/// Inputs of a directory tree
#[derive(Debug, Clone, Default)]
pub struct DirectoryTreeProps {
    pub config: DirectoryTreeConfig,
    pub tree_data: TreeData,
    /// Host-controlled selection; when set the tree never changes it
    pub selected_keys: Option<Vec<Key>>,
    /// Host-controlled expansion; when set the tree never changes it
    pub expanded_keys: Option<Vec<Key>>,
}

impl DirectoryTreeProps {
    pub fn new(tree_data: TreeData) -> Self {
        Self {
            tree_data,
            ..Default::default()
        }
    }

    pub fn with_config(mut self, config: DirectoryTreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_selected_keys(mut self, keys: Vec<Key>) -> Self {
        self.selected_keys = Some(keys);
        self
    }

    pub fn with_expanded_keys(mut self, keys: Vec<Key>) -> Self {
        self.expanded_keys = Some(keys);
        self
    }
}

/// Event passed to the select callback
#[derive(Debug, Clone, PartialEq)]
pub struct SelectInfo {
    /// Clicked node
    pub node: Key,
    /// Always true: a directory click never deselects
    pub selected: bool,
    /// Nodes for every selected key, in document order
    pub selected_nodes: Vec<TreeNode>,
    pub modifiers: Modifiers,
    pub mode: SelectMode,
}

/// Event passed to the expand callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandInfo {
    pub node: Key,
    pub expanded: bool,
}

/// Event passed to the click and double-click callbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickInfo {
    pub node: Key,
    pub modifiers: Modifiers,
}

pub type SelectHandler = Box<dyn FnMut(&[Key], &SelectInfo)>;
pub type ExpandHandler = Box<dyn FnMut(&[Key], &ExpandInfo)>;
pub type ClickHandler = Box<dyn FnMut(&ClickInfo)>;

#[derive(Default)]
struct Callbacks {
    on_select: Option<SelectHandler>,
    on_expand: Option<ExpandHandler>,
    on_click: Option<ClickHandler>,
    on_double_click: Option<ClickHandler>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_select", &self.on_select.is_some())
            .field("on_expand", &self.on_expand.is_some())
            .field("on_click", &self.on_click.is_some())
            .field("on_double_click", &self.on_double_click.is_some())
            .finish()
    }
}

/// Initial expanded keys of a directory tree
///
/// `None` means nothing is expanded.
pub fn compute_initial_expansion(
    entities: &KeyEntities,
    config: &DirectoryTreeConfig,
    controlled: Option<&[Key]>,
) -> Option<Vec<Key>> {
    let given = controlled
        .map(<[Key]>::to_vec)
        .or_else(|| config.default_expanded_keys.clone());

    if config.default_expand_all {
        Some(entities.keys().to_vec())
    } else if config.default_expand_parent {
        Some(entities.conduct_expand_parent(&given.unwrap_or_default()))
    } else {
        given
    }
}

/// Directory tree: folder semantics, click-to-expand and multi-select over a generic tree
#[derive(Debug)]
pub struct DirectoryTree {
    tree: GenericTree,
    config: DirectoryTreeConfig,
    selected: KeyState,
    expanded: KeyState,
    anchor: SelectionAnchor,
    /// Coalesces repeated expand gestures; one per tree instance
    expand_debouncer: Debouncer,
    callbacks: Callbacks,
}

impl DirectoryTree {
    pub fn new(props: DirectoryTreeProps) -> Self {
        Self::with_time_source(props, RealTimeSource::shared())
    }

    pub fn with_time_source(props: DirectoryTreeProps, time_source: SharedTimeSource) -> Self {
        let DirectoryTreeProps {
            config,
            tree_data,
            selected_keys,
            expanded_keys,
        } = props;

        let tree = GenericTree::new(directory_tree_config(&config.tree), tree_data)
            .with_icon(directory_icon);

        let initial_expanded =
            compute_initial_expansion(tree.entities(), &config, expanded_keys.as_deref());
        let expanded = match expanded_keys {
            // Host-controlled keys may still be widened by default_expand_*
            Some(_) => KeyState::Host(initial_expanded.unwrap_or_default()),
            None => KeyState::Local(initial_expanded.unwrap_or_default()),
        };
        let selected = KeyState::from_props(selected_keys, || {
            config.default_selected_keys.clone().unwrap_or_default()
        });

        tracing::debug!(
            "directory tree created: {} nodes, selection {}, expansion {}",
            tree.entities().len(),
            if selected.is_host_owned() { "host" } else { "local" },
            if expanded.is_host_owned() { "host" } else { "local" },
        );

        let mut directory = Self {
            tree,
            config,
            selected,
            expanded,
            anchor: SelectionAnchor::default(),
            expand_debouncer: Debouncer::new(EXPAND_DEBOUNCE, time_source),
            callbacks: Callbacks::default(),
        };
        directory.sync_core();
        directory
    }

    pub fn on_select(mut self, handler: impl FnMut(&[Key], &SelectInfo) + 'static) -> Self {
        self.callbacks.on_select = Some(Box::new(handler));
        self
    }

    pub fn on_expand(mut self, handler: impl FnMut(&[Key], &ExpandInfo) + 'static) -> Self {
        self.callbacks.on_expand = Some(Box::new(handler));
        self
    }

    pub fn on_click(mut self, handler: impl FnMut(&ClickInfo) + 'static) -> Self {
        self.callbacks.on_click = Some(Box::new(handler));
        self
    }

    pub fn on_double_click(mut self, handler: impl FnMut(&ClickInfo) + 'static) -> Self {
        self.callbacks.on_double_click = Some(Box::new(handler));
        self
    }

    pub fn tree(&self) -> &GenericTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut GenericTree {
        &mut self.tree
    }

    pub fn config(&self) -> &DirectoryTreeConfig {
        &self.config
    }

    pub fn selected_keys(&self) -> &[Key] {
        self.selected.keys()
    }

    pub fn expanded_keys(&self) -> &[Key] {
        self.expanded.keys()
    }

    pub fn selection_state(&self) -> &KeyState {
        &self.selected
    }

    pub fn expansion_state(&self) -> &KeyState {
        &self.expanded
    }

    pub fn anchor(&self) -> &SelectionAnchor {
        &self.anchor
    }

    /// Host re-render with new controlled selection
    pub fn set_selected_keys(&mut self, keys: Vec<Key>) {
        if self.selected.apply_host(keys) {
            self.sync_core();
        } else {
            tracing::warn!("selection is owned by the tree; ignoring host selected keys");
        }
    }

    /// Host re-render with new controlled expansion
    pub fn set_expanded_keys(&mut self, keys: Vec<Key>) {
        if self.expanded.apply_host(keys) {
            self.sync_core();
        } else {
            tracing::warn!("expansion is owned by the tree; ignoring host expanded keys");
        }
    }

    /// Replace the dataset
    pub fn update_tree_data(&mut self, data: TreeData) {
        self.tree.set_data(data);
    }

    /// Single click on a node
    ///
    /// Expands (when the expand action is a click), notifies `on_click`,
    /// then applies the select gesture.
    pub fn click(&mut self, key: &Key, modifiers: Modifiers) {
        if !self.tree.entities().contains(key) {
            tracing::warn!("click on unknown node {}", key);
            return;
        }
        self.tree.core_mut().set_cursor(Some(key.clone()));

        if self.config.expand_action == ExpandAction::Click {
            self.expand_folder_node(key, modifiers);
        }
        if let Some(on_click) = self.callbacks.on_click.as_mut() {
            on_click(&ClickInfo {
                node: key.clone(),
                modifiers,
            });
        }
        self.select(key, modifiers);
    }

    /// Double click on a node
    pub fn double_click(&mut self, key: &Key, modifiers: Modifiers) {
        if !self.tree.entities().contains(key) {
            tracing::warn!("double click on unknown node {}", key);
            return;
        }

        if self.config.expand_action == ExpandAction::DoubleClick {
            self.expand_folder_node(key, modifiers);
        }
        if let Some(on_double_click) = self.callbacks.on_double_click.as_mut() {
            on_double_click(&ClickInfo {
                node: key.clone(),
                modifiers,
            });
        }
    }

    /// Debounced folder toggle behind the configured expand action
    ///
    /// Leaves and modified clicks (selection gestures) never toggle. Returns
    /// true when the node was toggled.
    pub fn expand_folder_node(&mut self, key: &Key, modifiers: Modifiers) -> bool {
        if !self.expand_debouncer.should_fire() {
            return false;
        }

        let is_leaf = self.tree.entities().get(key).map_or(true, |e| e.is_leaf);
        if is_leaf || modifiers.any() {
            return false;
        }
        self.expand(key).is_some()
    }

    /// Toggle a folder through the renderer (switcher/arrow gesture, not debounced)
    ///
    /// Returns the new expanded keys, or None for leaves and unknown keys.
    pub fn expand(&mut self, key: &Key) -> Option<Vec<Key>> {
        let entity = self.tree.entities().get(key)?;
        if entity.is_leaf {
            return None;
        }

        let (keys, expanded) = self.tree.core().toggle_expand(key);
        tracing::debug!(
            "{} {}",
            if expanded { "expanded" } else { "collapsed" },
            key
        );

        self.set_uncontrolled_state(StateUpdate {
            expanded_keys: Some(keys.clone()),
            ..Default::default()
        });
        if let Some(on_expand) = self.callbacks.on_expand.as_mut() {
            on_expand(
                &keys,
                &ExpandInfo {
                    node: key.clone(),
                    expanded,
                },
            );
        }
        Some(keys)
    }

    /// Apply a select gesture
    ///
    /// Returns the keys reported to the host, or None when the node can't be
    /// selected.
    pub fn select(&mut self, key: &Key, modifiers: Modifiers) -> Option<Vec<Key>> {
        if !self.tree.config().selectable || !self.tree.is_node_selectable(key) {
            tracing::debug!("ignoring select of {}", key);
            return None;
        }

        let core = self.tree.core();
        let multiple = self.tree.config().multiple;
        let (toggled, _) = core.toggle_select(key, multiple);
        let visible = core.visible_order(self.tree.entities());

        let outcome = resolve_selection(SelectionInput {
            clicked: key,
            modifiers,
            multiple,
            anchor: &self.anchor,
            toggled: &toggled,
            visible: &visible,
        });
        tracing::debug!("{:?} select of {}: {} keys", outcome.mode, key, outcome.keys.len());
        self.anchor = outcome.anchor;
        let keys = outcome.keys;

        let info = SelectInfo {
            node: key.clone(),
            selected: true,
            selected_nodes: self
                .tree
                .entities()
                .keys_to_nodes(self.tree.data(), &keys)
                .into_iter()
                .cloned()
                .collect(),
            modifiers,
            mode: outcome.mode,
        };
        if let Some(on_select) = self.callbacks.on_select.as_mut() {
            on_select(&keys, &info);
        }

        self.set_uncontrolled_state(StateUpdate {
            selected_keys: Some(keys.clone()),
            ..Default::default()
        });
        Some(keys)
    }

    /// Write the parts of `update` the tree owns; host-owned parts are dropped
    fn set_uncontrolled_state(&mut self, update: StateUpdate) {
        let mut changed = false;
        if let Some(keys) = update.selected_keys {
            changed |= self.selected.apply_local(keys);
        }
        if let Some(keys) = update.expanded_keys {
            changed |= self.expanded.apply_local(keys);
        }
        if changed {
            self.sync_core();
        }
    }

    /// Render the current state through the core
    fn sync_core(&mut self) {
        let selected = self.selected.keys().to_vec();
        let expanded = self.expanded.keys().to_vec();
        let core = self.tree.core_mut();
        core.set_selected_keys(selected);
        core.set_expanded_keys(expanded);
    }
}

/// Generic tree settings with directory defaults applied
fn directory_tree_config(config: &TreeConfig) -> TreeConfig {
    let directory_class = format!("{}-directory", config.prefix_cls);
    let class_name = match config.class_name.as_deref() {
        Some(extra) if !extra.is_empty() => format!("{directory_class} {extra}"),
        _ => directory_class,
    };
    TreeConfig {
        show_icon: Some(config.show_icon.unwrap_or(true)),
        block_node: Some(config.block_node.unwrap_or(true)),
        class_name: Some(class_name),
        ..config.clone()
    }
}
