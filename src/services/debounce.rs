//! Leading-edge debouncing.
//!
//! The first call of a burst fires immediately. Every call, fired or not,
//! restarts the quiet window, so a burst only ends once no call has arrived
//! for the full window. Each `Debouncer` owns its own window state.

use super::time_source::SharedTimeSource;
use std::time::{Duration, Instant};

/// Default window used for folder expansion clicks
pub const EXPAND_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    /// Instant of the most recent call; the pending window ends `window` after it
    pending_since: Option<Instant>,
    time_source: SharedTimeSource,
}

impl Debouncer {
    pub fn new(window: Duration, time_source: SharedTimeSource) -> Self {
        Self {
            window,
            pending_since: None,
            time_source,
        }
    }

    /// Register a call and report whether it is the leading edge of a burst
    pub fn should_fire(&mut self) -> bool {
        let now = self.time_source.now();
        let fire = match self.pending_since {
            Some(last) => now.saturating_duration_since(last) >= self.window,
            None => true,
        };
        self.pending_since = Some(now);
        if !fire {
            tracing::trace!("call suppressed within {:?} window", self.window);
        }
        fire
    }
}
