//! Input types shared by the tree widgets and the demo event loop

pub mod modifiers;

pub use modifiers::Modifiers;
