//! Tree widgets
//!
//! Two layers, mirroring how a host uses them:
//! - [`GenericTree`] resolves display configuration (icons, switchers,
//!   classes, checkboxes, drop indicators) over the [`TreeCore`] engine that
//!   tracks selection, expansion, cursor and scrolling.
//! - [`DirectoryTree`] adds file-explorer semantics: folder icons, a
//!   debounced click-to-expand, and ctrl/shift multi-selection, with each of
//!   selection and expansion either owned by the host or by the widget.

pub mod core;
pub mod directory;
pub mod entities;
pub mod generic;
pub mod icons;
pub mod node;
pub mod selection;
pub mod state;

pub use self::core::{DisplayNode, TreeCore};
pub use directory::{
    compute_initial_expansion, ClickInfo, DirectoryTree, DirectoryTreeProps, ExpandInfo,
    SelectInfo,
};
pub use entities::{KeyEntities, KeyEntity};
pub use generic::{GenericTree, TreeRow};
pub use icons::{Icon, IconKind, Switcher};
pub use node::{keys, Key, TreeData, TreeNode};
pub use selection::{SelectMode, SelectionAnchor};
pub use state::{KeyState, StateUpdate};

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::node::{TreeData, TreeNode};

    /// Three roots; the middle one is disabled
    ///
    /// ```text
    /// 0-0
    /// ├─ 0-0-0
    /// │  ├─ 0-0-0-0
    /// │  └─ 0-0-0-1
    /// └─ 0-0-1
    /// 0-1 (disabled)
    /// └─ 0-1-0
    ///    └─ 0-1-0-0
    /// 0-2
    /// ```
    pub fn sample_data() -> TreeData {
        TreeData::new(vec![
            TreeNode::branch(
                "0-0",
                "parent 0",
                vec![
                    TreeNode::branch(
                        "0-0-0",
                        "child 0",
                        vec![
                            TreeNode::leaf("0-0-0-0", "leaf 0"),
                            TreeNode::leaf("0-0-0-1", "leaf 1"),
                        ],
                    ),
                    TreeNode::leaf("0-0-1", "child 1"),
                ],
            ),
            TreeNode::branch(
                "0-1",
                "parent 1",
                vec![TreeNode::branch(
                    "0-1-0",
                    "child 0",
                    vec![TreeNode::leaf("0-1-0-0", "leaf 0")],
                )],
            )
            .disabled(),
            TreeNode::leaf("0-2", "parent 2"),
        ])
    }
}
