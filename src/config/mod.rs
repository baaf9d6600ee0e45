//! Harness configuration for contend.
//!
//! Settings come from the environment and are read exactly once at startup:
//! - `SLEEP_TIME`: seconds a worker holds the lock once acquired (default 10)
//! - `CHANCE_TO_ACQUIRE`: gate modulus; a worker only attempts acquisition when
//!   its random draw is evenly divisible by this value (default 2)
//!
//! Malformed values are rejected up front rather than producing silently
//! wrong timing.

mod model;
mod operations;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::{
    CHANCE_TO_ACQUIRE_VAR, DEFAULT_CHANCE_TO_ACQUIRE, DEFAULT_IDLE_INTERVAL, DEFAULT_SLEEP_TIME,
    HarnessConfig, SLEEP_TIME_VAR,
};
