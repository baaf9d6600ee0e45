//! RAII lock guard implementation.

use super::clock::{Clock, SystemClock};
use super::file_lock::FileLock;
use crate::error::Result;
use std::path::Path;

/// Scoped possession of a [`FileLock`].
///
/// When dropped, the lock file is removed. If removal fails, a warning is
/// logged but no panic occurs; use [`release`](Self::release) to observe the
/// error instead.
#[derive(Debug)]
pub struct LockGuard<'a, C: Clock = SystemClock> {
    lock: &'a mut FileLock<C>,
}

impl<'a, C: Clock> LockGuard<'a, C> {
    pub(super) fn new(lock: &'a mut FileLock<C>) -> Self {
        Self { lock }
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        self.lock.lock_path()
    }

    /// Release the lock now and report any filesystem fault.
    pub fn release(self) -> Result<()> {
        self.lock.release()
    }
}

impl<C: Clock> Drop for LockGuard<'_, C> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.release() {
            tracing::warn!("failed to release lock '{}': {}", self.path().display(), e);
        }
    }
}
