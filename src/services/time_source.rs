//! Clocks behind the expand debounce.
//!
//! A `DirectoryTree` reads time only through a `SharedTimeSource`, so the
//! 200 ms click window can be driven by hand in tests instead of sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub trait TimeSource: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
}

/// Clock handle shared by trees and their debouncers
pub type SharedTimeSource = Arc<dyn TimeSource>;

/// Wall clock used outside tests
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeSource;

impl RealTimeSource {
    pub fn shared() -> SharedTimeSource {
        Arc::new(Self)
    }
}

impl TimeSource for RealTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually stepped clock
///
/// Stands still until `advance` is called, so a burst of clicks can be
/// placed precisely inside or outside a debounce window.
///
/// ```
/// use dirtree::services::time_source::{TestTimeSource, TimeSource};
/// use std::time::Duration;
///
/// let clock = TestTimeSource::new();
/// let click = clock.now();
/// clock.advance(Duration::from_millis(199));
/// assert!(clock.now() - click < Duration::from_millis(200));
/// ```
#[derive(Debug)]
pub struct TestTimeSource {
    /// Nanoseconds stepped so far
    offset_nanos: AtomicU64,
    origin: Instant,
}

impl Default for TestTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTimeSource {
    pub fn new() -> Self {
        Self {
            offset_nanos: AtomicU64::new(0),
            origin: Instant::now(),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn advance(&self, step: Duration) {
        self.offset_nanos
            .fetch_add(step.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Total time stepped since creation
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

impl TimeSource for TestTimeSource {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}
