//! Terminal rendering of tree widgets

pub mod tree_renderer;

pub use tree_renderer::{TreeRenderer, TreeTheme};
