use crate::view::tree::icons::Icon;
use crate::view::tree::node::Key;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_true() -> bool {
    true
}

fn default_prefix_cls() -> String {
    "nsc-tree".to_string()
}

fn default_item_height() -> usize {
    1
}

/// Text direction of the tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Which gesture toggles a folder in a directory tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ExpandAction {
    #[default]
    Click,
    DoubleClick,
}

/// Connecting-line mode
///
/// Either a plain flag or an object controlling the leaf icon in line mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ShowLine {
    Enabled(bool),
    WithOptions {
        #[serde(rename = "showLeafIcon", default)]
        show_leaf_icon: bool,
    },
}

impl Default for ShowLine {
    fn default() -> Self {
        ShowLine::Enabled(false)
    }
}

impl ShowLine {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ShowLine::Enabled(false))
    }

    /// Whether leaves draw a file icon in line mode
    pub fn show_leaf_icon(&self) -> bool {
        match self {
            ShowLine::Enabled(enabled) => *enabled,
            ShowLine::WithOptions { show_leaf_icon } => *show_leaf_icon,
        }
    }
}

/// Display configuration of a generic tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfig {
    /// Prefix used for every composed class name
    #[serde(default = "default_prefix_cls")]
    pub prefix_cls: String,

    /// Extra class appended after the modifier classes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Show node icons (generic trees default to hidden, directory trees to shown)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_icon: Option<bool>,

    /// Draw connecting lines
    #[serde(default)]
    pub show_line: ShowLine,

    /// Caller-supplied switcher icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switcher_icon: Option<Icon>,

    /// Node rows span the full width (directory trees default to true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_node: Option<bool>,

    /// Render a checkbox in front of each node
    #[serde(default)]
    pub checkable: bool,

    /// Nodes react to select gestures
    #[serde(default = "default_true")]
    pub selectable: bool,

    /// Allow more than one selected node
    #[serde(default)]
    pub multiple: bool,

    /// Render only the rows inside the viewport
    #[serde(default = "default_true", rename = "virtual")]
    pub virtual_list: bool,

    /// Rows per tree item
    #[serde(default = "default_item_height")]
    pub item_height: usize,

    #[serde(default)]
    pub direction: Direction,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            prefix_cls: default_prefix_cls(),
            class_name: None,
            show_icon: None,
            show_line: ShowLine::default(),
            switcher_icon: None,
            block_node: None,
            checkable: false,
            selectable: true,
            multiple: false,
            virtual_list: true,
            item_height: default_item_height(),
            direction: Direction::default(),
        }
    }
}

/// Configuration of a directory tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryTreeConfig {
    #[serde(flatten)]
    pub tree: TreeConfig,

    #[serde(default)]
    pub expand_action: ExpandAction,

    /// Expand every node on first render
    #[serde(default)]
    pub default_expand_all: bool,

    /// Expand the ancestors of the initially expanded keys
    #[serde(default)]
    pub default_expand_parent: bool,

    /// Initially expanded keys when expansion is not host-controlled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_expanded_keys: Option<Vec<Key>>,

    /// Initially selected keys when selection is not host-controlled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_selected_keys: Option<Vec<Key>>,
}

impl DirectoryTreeConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: DirectoryTreeConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tree.item_height == 0 {
            return Err(ConfigError::ValidationError(
                "itemHeight must be at least 1".to_string(),
            ));
        }
        if self.tree.prefix_cls.is_empty() {
            return Err(ConfigError::ValidationError(
                "prefixCls must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
