//! Config struct definition and default implementation.

use std::time::Duration;

/// Environment variable holding the dwell time in seconds.
pub const SLEEP_TIME_VAR: &str = "SLEEP_TIME";

/// Environment variable holding the gate modulus.
pub const CHANCE_TO_ACQUIRE_VAR: &str = "CHANCE_TO_ACQUIRE";

pub const DEFAULT_SLEEP_TIME: Duration = Duration::from_secs(10);

pub const DEFAULT_CHANCE_TO_ACQUIRE: u32 = 2;

/// Fixed pause between worker iterations.
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_secs(1);

/// Settings shared by every harness worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// How long a worker holds the lock after acquiring it.
    pub sleep_time: Duration,

    /// Gate modulus. Always greater than zero once validated.
    pub chance_to_acquire: u32,

    /// Pause after every iteration, whatever its outcome.
    pub idle_interval: Duration,

    /// Timeout for each acquisition attempt. Zero means a single attempt.
    pub acquire_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            sleep_time: DEFAULT_SLEEP_TIME,
            chance_to_acquire: DEFAULT_CHANCE_TO_ACQUIRE,
            idle_interval: DEFAULT_IDLE_INTERVAL,
            acquire_timeout: Duration::ZERO,
        }
    }
}
