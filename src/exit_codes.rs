//! Exit code constants for the contend CLI.
//!
//! - 0: Success (including a clean shutdown after Ctrl-C)
//! - 1: Configuration error (bad environment values or arguments)
//! - 2: I/O failure while creating or removing the lock file
//! - 3: Worker failure (a worker thread panicked)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Configuration error: malformed `SLEEP_TIME` / `CHANCE_TO_ACQUIRE` or bad flags.
pub const CONFIG_ERROR: i32 = 1;

/// I/O failure: lock file or event log could not be created, written or removed.
pub const IO_FAILURE: i32 = 2;

/// Worker failure: a harness worker thread terminated abnormally.
pub const WORKER_FAILURE: i32 = 3;
