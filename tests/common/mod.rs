// Shared fixtures for integration tests

#![allow(dead_code)]

use dirtree::config::DirectoryTreeConfig;
use dirtree::services::time_source::TestTimeSource;
use dirtree::view::tree::{DirectoryTree, DirectoryTreeProps, Key, TreeData, TreeNode};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// A small project layout, in display order:
///
/// ```text
/// src
///   src/main.rs
///   src/lib.rs
///   src/view
///     src/view/mod.rs
/// tests
///   tests/a.rs
/// Cargo.toml
/// README.md
/// ```
pub fn project_tree() -> TreeData {
    TreeData::new(vec![
        TreeNode::branch(
            "src",
            "src",
            vec![
                TreeNode::leaf("src/main.rs", "main.rs"),
                TreeNode::leaf("src/lib.rs", "lib.rs"),
                TreeNode::branch(
                    "src/view",
                    "view",
                    vec![TreeNode::leaf("src/view/mod.rs", "mod.rs")],
                ),
            ],
        ),
        TreeNode::branch("tests", "tests", vec![TreeNode::leaf("tests/a.rs", "a.rs")]),
        TreeNode::leaf("Cargo.toml", "Cargo.toml"),
        TreeNode::leaf("README.md", "README.md"),
    ])
}

pub fn multiple() -> DirectoryTreeConfig {
    let mut config = DirectoryTreeConfig::default();
    config.tree.multiple = true;
    config
}

/// Build a directory tree on a controllable clock
pub fn build(props: DirectoryTreeProps) -> (Arc<TestTimeSource>, DirectoryTree) {
    let time = TestTimeSource::shared();
    let tree = DirectoryTree::with_time_source(props, time.clone());
    (time, tree)
}

/// Records the key lists passed to a callback
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Vec<Key>>>>);

impl Recorder {
    pub fn push(&self, keys: &[Key]) {
        self.0.borrow_mut().push(keys.to_vec());
    }

    pub fn calls(&self) -> Vec<Vec<Key>> {
        self.0.borrow().clone()
    }

    pub fn last(&self) -> Option<Vec<Key>> {
        self.0.borrow().last().cloned()
    }
}
