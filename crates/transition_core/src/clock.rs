//! Time sources for settle animations.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Monotonic time since an arbitrary, fixed epoch.
pub trait FrameClock: Send + Sync {
    fn now(&self) -> Duration;
}

impl<T> FrameClock for Arc<T>
where
    T: FrameClock + ?Sized,
{
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Wall-clock backed by [`Instant`], anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Share it through an `Arc` to keep a
/// handle while the controller owns the other end.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(duration_to_nanos(by), Ordering::SeqCst);
    }

    /// Moves the clock to `at`. Never moves backwards.
    pub fn set(&self, at: Duration) {
        self.nanos.fetch_max(duration_to_nanos(at), Ordering::SeqCst);
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

fn duration_to_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
