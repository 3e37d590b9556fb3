//! View layer
//!
//! `tree` holds the widget state machines; `ui` draws them with ratatui.

pub mod tree;
pub mod ui;
