use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Unique identifier for a tree node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key(value)
    }
}

/// Build a key list from anything string-like
pub fn keys<I, S>(items: I) -> Vec<Key>
where
    I: IntoIterator<Item = S>,
    S: Into<Key>,
{
    items.into_iter().map(Into::into).collect()
}

fn default_true() -> bool {
    true
}

/// A node of the tree dataset
///
/// Children are ordered; that order is the display order and the order used
/// for range selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Unique key
    pub key: Key,
    /// Display text
    pub title: String,
    /// Child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    /// Explicit leaf flag. When absent a node is a leaf iff it has no children.
    #[serde(default, rename = "isLeaf", skip_serializing_if = "Option::is_none")]
    pub is_leaf: Option<bool>,
    /// Disabled nodes can't be selected and stop ancestor expansion
    #[serde(default)]
    pub disabled: bool,
    /// Whether the node reacts to select gestures
    #[serde(default = "default_true")]
    pub selectable: bool,
    /// Arbitrary host data carried along with the node
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl TreeNode {
    /// Create a node with no children and no explicit leaf flag
    pub fn new(key: impl Into<Key>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            children: Vec::new(),
            is_leaf: None,
            disabled: false,
            selectable: true,
            payload: serde_json::Value::Null,
        }
    }

    /// A file-like node that can never be expanded
    pub fn leaf(key: impl Into<Key>, title: impl Into<String>) -> Self {
        Self {
            is_leaf: Some(true),
            ..Self::new(key, title)
        }
    }

    /// A folder-like node with the given children
    pub fn branch(key: impl Into<Key>, title: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            children,
            is_leaf: Some(false),
            ..Self::new(key, title)
        }
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn unselectable(mut self) -> Self {
        self.selectable = false;
        self
    }

    /// Check if this node is a leaf (cannot be expanded)
    pub fn is_leaf(&self) -> bool {
        self.is_leaf.unwrap_or(self.children.is_empty())
    }
}

/// Ordered list of root nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeData {
    pub roots: Vec<TreeNode>,
}

impl TreeData {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }

    /// Visit every node in document order (pre-order, depth first)
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(&'a TreeNode, usize)) {
        fn go<'a>(nodes: &'a [TreeNode], depth: usize, visit: &mut impl FnMut(&'a TreeNode, usize)) {
            for node in nodes {
                visit(node, depth);
                go(&node.children, depth + 1, visit);
            }
        }
        go(&self.roots, 0, &mut visit);
    }

    /// Build a dataset from a directory on disk
    ///
    /// Directories come first, then files, both ordered by case-insensitive
    /// name. Keys are paths relative to `root` using `/` separators.
    /// Directories deeper than `max_depth` are kept as unexpanded folders.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a readable directory.
    pub fn from_dir(root: &Path, max_depth: usize) -> io::Result<Self> {
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Path is not a directory: {:?}", root),
            ));
        }
        let roots = read_dir_nodes(root, "", max_depth)?;
        Ok(Self { roots })
    }
}

fn read_dir_nodes(dir: &Path, prefix: &str, depth_left: usize) -> io::Result<Vec<TreeNode>> {
    let mut entries: Vec<(String, bool)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push((entry.file_name().to_string_lossy().into_owned(), is_dir));
    }

    entries.sort_by(|a, b| match (a.1, b.1) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.0.to_lowercase().cmp(&b.0.to_lowercase()),
    });

    let mut nodes = Vec::with_capacity(entries.len());
    for (name, is_dir) in entries {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };
        if !is_dir {
            nodes.push(TreeNode::leaf(key, name));
            continue;
        }

        let children = if depth_left > 0 {
            match read_dir_nodes(&dir.join(&name), &key, depth_left - 1) {
                Ok(children) => children,
                Err(e) => {
                    tracing::warn!("Failed to read directory {:?}: {}", dir.join(&name), e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        nodes.push(TreeNode::branch(key, name, children));
    }
    Ok(nodes)
}
