//! Time source used by the acquisition loop.

use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time plus the ability to wait.
///
/// [`FileLock`](super::FileLock) only ever measures elapsed time and sleeps
/// between attempts through this trait, so a test clock can expire a timeout
/// without any real waiting.
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation backed by `Instant::now` and `thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
