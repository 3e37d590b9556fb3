use super::core::{DisplayNode, TreeCore};
use super::entities::KeyEntities;
use super::icons::{switcher_icon, Icon, Switcher, SwitcherContext, SwitcherState};
use super::node::{Key, TreeData};
use crate::config::{Direction, ShowLine, TreeConfig};

/// Builds the per-node icon from (is_leaf, expanded)
pub type IconFactory = fn(bool, bool) -> Icon;

/// Builds the drag-drop indicator for a drop target
pub type DropIndicatorRender = fn(DropIndicatorProps) -> DropIndicator;

const DROP_INDICATOR_OFFSET: i32 = 4;

/// Checkbox drawn in front of each node when the tree is checkable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkbox {
    pub class: String,
}

/// Where a dragged node would land relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    Inside,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropIndicatorProps {
    pub drop_position: DropPosition,
    /// Levels between the drop target and the resulting parent
    pub drop_level_offset: i32,
    /// Indent width of one level
    pub indent: i32,
    pub direction: Direction,
}

/// Placement of the drop indicator line relative to the target row
///
/// `start`/`end` are measured from the leading/trailing edge, which swap
/// under RTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIndicator {
    pub start: i32,
    pub end: i32,
    pub top: Option<i32>,
    pub bottom: Option<i32>,
    pub direction: Direction,
    pub class: String,
}

impl DropIndicator {
    pub fn left(&self) -> i32 {
        match self.direction {
            Direction::Ltr => self.start,
            Direction::Rtl => self.end,
        }
    }

    pub fn right(&self) -> i32 {
        match self.direction {
            Direction::Ltr => self.end,
            Direction::Rtl => self.start,
        }
    }
}

fn drop_indicator_render(props: DropIndicatorProps) -> DropIndicator {
    let mut indicator = DropIndicator {
        start: -props.drop_level_offset * props.indent + DROP_INDICATOR_OFFSET,
        end: 0,
        top: None,
        bottom: None,
        direction: props.direction,
        class: String::new(),
    };
    match props.drop_position {
        DropPosition::Before => indicator.top = Some(-3),
        DropPosition::After => indicator.bottom = Some(-3),
        DropPosition::Inside => {
            indicator.bottom = Some(-3);
            indicator.start = props.indent + DROP_INDICATOR_OFFSET;
        }
    }
    indicator
}

/// Settings forwarded to the low-level renderer
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub item_height: usize,
    pub virtual_list: bool,
    pub direction: Direction,
    pub show_line: ShowLine,
    pub checkbox: Option<Checkbox>,
    pub drop_indicator: DropIndicatorRender,
}

/// A fully resolved row, ready to be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub node: DisplayNode,
    pub title: String,
    pub switcher: Option<Switcher>,
    pub icon: Option<Icon>,
    pub checkbox: Option<Checkbox>,
}

/// Generic tree: display configuration over the tree core
#[derive(Debug, Clone)]
pub struct GenericTree {
    config: TreeConfig,
    data: TreeData,
    entities: KeyEntities,
    titles: std::collections::HashMap<Key, String>,
    icon: Option<IconFactory>,
    core: TreeCore,
}

impl GenericTree {
    pub fn new(config: TreeConfig, data: TreeData) -> Self {
        let core = TreeCore::new(config.item_height, config.virtual_list);
        let mut tree = Self {
            config,
            data: TreeData::default(),
            entities: KeyEntities::default(),
            titles: Default::default(),
            icon: None,
            core,
        };
        tree.set_data(data);
        tree
    }

    /// Use a custom node icon factory
    pub fn with_icon(mut self, icon: IconFactory) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Replace the dataset and rebuild the key index
    pub fn set_data(&mut self, data: TreeData) {
        self.entities = KeyEntities::from_data(&data);
        self.titles.clear();
        data.walk(|node, _| {
            self.titles.insert(node.key.clone(), node.title.clone());
        });
        self.data = data;
        tracing::debug!("tree data updated: {} nodes", self.entities.len());
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn data(&self) -> &TreeData {
        &self.data
    }

    pub fn entities(&self) -> &KeyEntities {
        &self.entities
    }

    pub fn core(&self) -> &TreeCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut TreeCore {
        &mut self.core
    }

    pub fn show_icon(&self) -> bool {
        self.config.show_icon.unwrap_or(false)
    }

    pub fn block_node(&self) -> bool {
        self.config.block_node.unwrap_or(false)
    }

    pub fn direction(&self) -> Direction {
        self.config.direction
    }

    /// Class list of the container, modifiers first
    pub fn class_names(&self) -> Vec<String> {
        let prefix = &self.config.prefix_cls;
        let modifiers = [
            ("icon-hide", !self.show_icon()),
            ("block-node", self.block_node()),
            ("unselectable", !self.config.selectable),
            ("rtl", self.config.direction == Direction::Rtl),
        ];
        modifiers
            .iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| format!("{prefix}-{name}"))
            .chain(
                self.config
                    .class_name
                    .iter()
                    .filter(|c| !c.is_empty())
                    .cloned(),
            )
            .collect()
    }

    /// Checkbox element, or None when checkboxes are disabled
    pub fn checkbox(&self) -> Option<Checkbox> {
        self.config.checkable.then(|| Checkbox {
            class: format!("{}-checkbox-inner", self.config.prefix_cls),
        })
    }

    pub fn switcher_for(&self, node: &DisplayNode) -> Option<Switcher> {
        switcher_icon(&SwitcherContext {
            prefix_cls: &self.config.prefix_cls,
            custom: self.config.switcher_icon.as_ref(),
            show_line: self.config.show_line,
            node: SwitcherState {
                is_leaf: node.is_leaf,
                expanded: node.expanded,
                loading: node.loading,
            },
        })
    }

    /// Node icon, None when icons are hidden or no factory is set
    pub fn icon_for(&self, node: &DisplayNode) -> Option<Icon> {
        if !self.show_icon() {
            return None;
        }
        self.icon.map(|factory| factory(node.is_leaf, node.expanded))
    }

    /// Drop indicator for a drag over a row
    pub fn drop_indicator(&self, props: &DropIndicatorProps) -> DropIndicator {
        let mut indicator = (self.renderer_config().drop_indicator)(*props);
        indicator.class = format!("{}-drop-indicator", self.config.prefix_cls);
        indicator
    }

    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            item_height: self.core.item_height(),
            virtual_list: self.core.is_virtual(),
            direction: self.config.direction,
            show_line: self.config.show_line,
            checkbox: self.checkbox(),
            drop_indicator: drop_indicator_render,
        }
    }

    /// Resolve every visible row
    pub fn rows(&self) -> Vec<TreeRow> {
        let checkbox = self.checkbox();
        self.core
            .display_nodes(&self.entities)
            .into_iter()
            .map(|node| TreeRow {
                title: self.titles.get(&node.key).cloned().unwrap_or_default(),
                switcher: self.switcher_for(&node),
                icon: self.icon_for(&node),
                checkbox: checkbox.clone(),
                node,
            })
            .collect()
    }

    /// Expand or collapse a node in place
    pub fn toggle_expand(&mut self, key: &Key) -> bool {
        if self.entities.get(key).map_or(true, |e| e.is_leaf) {
            return false;
        }
        let (keys, expanded) = self.core.toggle_expand(key);
        self.core.set_expanded_keys(keys);
        expanded
    }

    /// Select or deselect a node in place
    pub fn toggle_select(&mut self, key: &Key) -> bool {
        if !self.config.selectable || !self.is_node_selectable(key) {
            return false;
        }
        let (keys, selected) = self.core.toggle_select(key, self.config.multiple);
        self.core.set_selected_keys(keys);
        selected
    }

    pub fn cursor_next(&mut self) {
        self.core.cursor_next(&self.entities);
    }

    pub fn cursor_prev(&mut self) {
        self.core.cursor_prev(&self.entities);
    }

    /// Whether a select gesture on `key` is allowed
    pub fn is_node_selectable(&self, key: &Key) -> bool {
        let mut selectable = None;
        self.data.walk(|node, _| {
            if selectable.is_none() && &node.key == key {
                selectable = Some(node.selectable && !node.disabled);
            }
        });
        selectable.unwrap_or(false)
    }
}
