//! Config loading and validation.

use super::model::{CHANCE_TO_ACQUIRE_VAR, HarnessConfig, SLEEP_TIME_VAR};
use crate::error::{ContendError, Result};
use std::env::{self, VarError};
use std::time::Duration;

impl HarnessConfig {
    /// Load config from the process environment.
    ///
    /// Unset variables fall back to their defaults; set but malformed ones
    /// are an error.
    pub fn from_env() -> Result<Self> {
        let sleep_time = read_env(SLEEP_TIME_VAR)?;
        let chance_to_acquire = read_env(CHANCE_TO_ACQUIRE_VAR)?;

        Self::from_lookup(|key| match key {
            SLEEP_TIME_VAR => sleep_time.clone(),
            CHANCE_TO_ACQUIRE_VAR => chance_to_acquire.clone(),
            _ => None,
        })
    }

    /// Load config using `lookup` to resolve variable names.
    ///
    /// # Returns
    ///
    /// * `Ok(HarnessConfig)` - Defaults overlaid with any values found
    /// * `Err(ContendError::Config)` - A value is not a non-negative integer, or
    ///   validation failed
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(SLEEP_TIME_VAR) {
            config.sleep_time = Duration::from_secs(parse_integer(SLEEP_TIME_VAR, &raw)?);
        }

        if let Some(raw) = lookup(CHANCE_TO_ACQUIRE_VAR) {
            let chance = parse_integer(CHANCE_TO_ACQUIRE_VAR, &raw)?;
            config.chance_to_acquire = u32::try_from(chance).map_err(|_| {
                ContendError::Config(format!(
                    "{} is too large (got '{}')",
                    CHANCE_TO_ACQUIRE_VAR,
                    raw.trim()
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the per-attempt acquisition timeout.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `chance_to_acquire` must be positive (it is used as a modulus)
    pub fn validate(&self) -> Result<()> {
        if self.chance_to_acquire == 0 {
            return Err(ContendError::Config(format!(
                "{} must be greater than 0",
                CHANCE_TO_ACQUIRE_VAR
            )));
        }

        Ok(())
    }
}

fn parse_integer(name: &str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        ContendError::Config(format!(
            "{} must be a non-negative integer (got '{}')",
            name, raw
        ))
    })
}

/// Read one variable; unset is `None`, non-UTF-8 is a config error.
fn read_env(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(ContendError::Config(format!(
            "{} must be a non-negative integer (got non-UTF-8 value {:?})",
            name, raw
        ))),
    }
}
