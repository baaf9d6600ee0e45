//! Contention harness for contend.
//!
//! Spawns one named thread per worker identity. Every worker loops until the
//! shared [`StopToken`] is cancelled:
//! 1. Draw a random number in `1..=25`
//! 2. If the draw passes the gate (`draw % chance_to_acquire == 0`), make one
//!    acquisition attempt on the shared lock file
//! 3. If the lock was obtained, hold it for the dwell time
//! 4. Sleep the idle interval, whatever happened
//!
//! Workers share nothing but the stop token and the lock file on disk.
//! Cancellation is only observed at the top of an iteration, so a worker that
//! is holding the lock always finishes its dwell and releases first.

mod runner;
mod stop;
mod worker;


// Re-export public API
pub use runner::{Harness, RunSummary};
pub use stop::StopToken;
pub use worker::{DRAW_MAX, DRAW_MIN, is_gated_in};
