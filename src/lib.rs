// Directory tree widget library - exposes all core modules for testing

pub mod config;
pub mod input;
pub mod services;
pub mod view;
