//! Supporting services: time, debouncing, logging and terminal setup

pub mod debounce;
#[cfg(feature = "runtime")]
pub mod terminal_modes;
pub mod time_source;
#[cfg(feature = "runtime")]
pub mod tracing_setup;
