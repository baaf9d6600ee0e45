//! Cross-process file locking for contend.
//!
//! A lock is a plain empty marker file next to the resource it protects
//! (`<resource>.lock`). Possession is taken with **create_new** semantics
//! (exclusive create): the filesystem guarantees that at most one caller can
//! create a given path, which is what makes the lock safe across threads and
//! processes alike. There is no in-memory mutex involved.
//!
//! # Acquisition
//!
//! [`FileLock::acquire`] retries the exclusive create every
//! [`POLL_INTERVAL`] until it succeeds or the timeout elapses. A timeout of
//! zero means exactly one attempt. Failing to acquire is reported as
//! `Ok(false)`, never as an error; any filesystem failure other than
//! "already exists" propagates.
//!
//! # RAII Guards
//!
//! [`FileLock::lock`] and [`FileLock::with_lock`] tie possession to a scope:
//! the lock file is removed on every exit path, including unwinding out of a
//! panicking body. A `FileLock` that is dropped while held releases itself as
//! well. Release failures during drop are logged, never raised.
//!
//! # Limitations
//!
//! A process killed while holding a lock leaves the lock file behind. There
//! is no expiry or heartbeat; the file must be removed by hand.

mod clock;
mod file_lock;
mod guard;
mod path;


// Re-export public API
pub use clock::{Clock, SystemClock};
pub use file_lock::{DEFAULT_TIMEOUT, FileLock, POLL_INTERVAL};
pub use guard::LockGuard;
pub use path::{LOCK_SUFFIX, lock_path_for};
