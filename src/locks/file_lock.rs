//! Lock acquisition and release.

use super::clock::{Clock, SystemClock};
use super::guard::LockGuard;
use super::path::lock_path_for;
use crate::error::{ContendError, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Timeout used by [`FileLock::lock`] unless overridden with
/// [`FileLock::with_timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Delay between create attempts while the lock file exists.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// An exclusive lock on a named resource, backed by a marker file.
///
/// The lock is either unheld (`handle` is `None`) or held (`handle` is the
/// file this instance created, and the lock file exists on disk).
#[derive(Debug)]
pub struct FileLock<C: Clock = SystemClock> {
    /// The resource being protected, as given by the caller.
    target: PathBuf,

    /// Derived marker path (see [`lock_path_for`]).
    lock_path: PathBuf,

    /// Open handle from the exclusive create; present only while held.
    handle: Option<File>,

    /// Timeout applied by scoped acquisition.
    timeout: Duration,

    clock: C,
}

impl FileLock<SystemClock> {
    /// Create an unheld lock for `target` using the wall clock.
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self::with_clock(target, SystemClock)
    }
}

impl<C: Clock> FileLock<C> {
    /// Create an unheld lock for `target` that measures time with `clock`.
    pub fn with_clock(target: impl Into<PathBuf>, clock: C) -> Self {
        let target = target.into();
        let lock_path = lock_path_for(&target);
        Self {
            target,
            lock_path,
            handle: None,
            timeout: DEFAULT_TIMEOUT,
            clock,
        }
    }

    /// Set the timeout used by [`lock`](Self::lock) and [`with_lock`](Self::with_lock).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The resource path this lock protects.
    pub fn target_path(&self) -> &Path {
        &self.target
    }

    /// The marker file whose existence means "held".
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_held(&self) -> bool {
        self.handle.is_some()
    }

    /// Try to take the lock, polling until `timeout` has elapsed.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The lock file was created by this call (or was already
    ///   held by this instance)
    /// * `Ok(false)` - The lock file still existed when the timeout ran out
    /// * `Err(ContendError::Io)` - Creating the lock file failed for any reason
    ///   other than it already existing
    ///
    /// A zero `timeout` makes exactly one attempt and never sleeps.
    pub fn acquire(&mut self, timeout: Duration) -> Result<bool> {
        if self.handle.is_some() {
            return Ok(true);
        }

        let started = self.clock.now();
        loop {
            match OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(&self.lock_path)
            {
                Ok(file) => {
                    self.handle = Some(file);
                    tracing::debug!(lock = %self.lock_path.display(), "lock acquired");
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    let elapsed = self.clock.now().saturating_duration_since(started);
                    if elapsed >= timeout {
                        if !timeout.is_zero() {
                            tracing::info!(
                                target_path = %self.target.display(),
                                timeout = ?timeout,
                                "timed out waiting for lock"
                            );
                        }
                        return Ok(false);
                    }
                    self.clock.sleep(POLL_INTERVAL.min(timeout - elapsed));
                }
                Err(e) => {
                    return Err(ContendError::io(
                        format!("failed to create lock file '{}'", self.lock_path.display()),
                        e,
                    ));
                }
            }
        }
    }

    /// Make a single acquisition attempt without waiting.
    pub fn try_acquire(&mut self) -> Result<bool> {
        self.acquire(Duration::ZERO)
    }

    /// Release the lock if this instance holds it.
    ///
    /// Closes the handle and removes the lock file. Calling this on an unheld
    /// lock does nothing.
    pub fn release(&mut self) -> Result<()> {
        let Some(file) = self.handle.take() else {
            return Ok(());
        };
        drop(file);

        fs::remove_file(&self.lock_path).map_err(|e| {
            ContendError::io(
                format!("failed to remove lock file '{}'", self.lock_path.display()),
                e,
            )
        })?;
        tracing::debug!(lock = %self.lock_path.display(), "lock released");
        Ok(())
    }

    /// Acquire with the configured timeout and return a guard that releases
    /// on drop.
    ///
    /// `Ok(None)` means the lock was not obtained; the caller must not touch
    /// the protected resource.
    pub fn lock(&mut self) -> Result<Option<LockGuard<'_, C>>> {
        if self.acquire(self.timeout)? {
            Ok(Some(LockGuard::new(self)))
        } else {
            Ok(None)
        }
    }

    /// Run `body` while holding the lock.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The lock was obtained, `body` ran and the lock
    ///   was released
    /// * `Ok(None)` - The lock was not obtained; `body` did not run
    /// * `Err(_)` - Acquisition or release hit a filesystem fault
    ///
    /// If `body` panics the lock is still released while unwinding.
    pub fn with_lock<R>(&mut self, body: impl FnOnce() -> R) -> Result<Option<R>> {
        let Some(guard) = self.lock()? else {
            return Ok(None);
        };
        let value = body();
        guard.release()?;
        Ok(Some(value))
    }
}

impl<C: Clock> Drop for FileLock<C> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("failed to release lock on drop: {}", e);
        }
    }
}
