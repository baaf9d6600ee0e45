//! Tests for config functionality.

use crate::config::{
    CHANCE_TO_ACQUIRE_VAR, DEFAULT_CHANCE_TO_ACQUIRE, DEFAULT_IDLE_INTERVAL, DEFAULT_SLEEP_TIME,
    HarnessConfig, SLEEP_TIME_VAR,
};
use crate::error::ContendError;
use serial_test::serial;
use std::collections::HashMap;
use std::time::Duration;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_default_config() {
    let config = HarnessConfig::default();

    assert_eq!(config.sleep_time, Duration::from_secs(10));
    assert_eq!(config.chance_to_acquire, 2);
    assert_eq!(config.idle_interval, Duration::from_secs(1));
    assert_eq!(config.acquire_timeout, Duration::ZERO);
}

#[test]
fn test_empty_environment_uses_defaults() {
    let config = HarnessConfig::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(config.sleep_time, DEFAULT_SLEEP_TIME);
    assert_eq!(config.chance_to_acquire, DEFAULT_CHANCE_TO_ACQUIRE);
    assert_eq!(config.idle_interval, DEFAULT_IDLE_INTERVAL);
}

#[test]
fn test_values_are_read() {
    let config = HarnessConfig::from_lookup(lookup_from(&[
        (SLEEP_TIME_VAR, "3"),
        (CHANCE_TO_ACQUIRE_VAR, "5"),
    ]))
    .unwrap();

    assert_eq!(config.sleep_time, Duration::from_secs(3));
    assert_eq!(config.chance_to_acquire, 5);
}

#[test]
fn test_surrounding_whitespace_is_tolerated() {
    let config = HarnessConfig::from_lookup(lookup_from(&[(SLEEP_TIME_VAR, " 4\n")])).unwrap();
    assert_eq!(config.sleep_time, Duration::from_secs(4));
}

#[test]
fn test_zero_sleep_time_is_allowed() {
    let config = HarnessConfig::from_lookup(lookup_from(&[(SLEEP_TIME_VAR, "0")])).unwrap();
    assert_eq!(config.sleep_time, Duration::ZERO);
}

#[test]
fn test_non_integer_sleep_time_fails() {
    let err = HarnessConfig::from_lookup(lookup_from(&[(SLEEP_TIME_VAR, "ten")])).unwrap_err();

    assert!(matches!(err, ContendError::Config(_)));
    assert!(err.to_string().contains("SLEEP_TIME"));
    assert!(err.to_string().contains("ten"));
}

#[test]
fn test_fractional_sleep_time_fails() {
    let err = HarnessConfig::from_lookup(lookup_from(&[(SLEEP_TIME_VAR, "1.5")])).unwrap_err();
    assert!(matches!(err, ContendError::Config(_)));
}

#[test]
fn test_negative_chance_fails() {
    let err =
        HarnessConfig::from_lookup(lookup_from(&[(CHANCE_TO_ACQUIRE_VAR, "-2")])).unwrap_err();

    assert!(matches!(err, ContendError::Config(_)));
    assert!(err.to_string().contains("CHANCE_TO_ACQUIRE"));
}

#[test]
fn test_zero_chance_fails_validation() {
    let err =
        HarnessConfig::from_lookup(lookup_from(&[(CHANCE_TO_ACQUIRE_VAR, "0")])).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Invalid configuration: CHANCE_TO_ACQUIRE must be greater than 0"
    );
}

#[test]
fn test_oversized_chance_fails() {
    let err = HarnessConfig::from_lookup(lookup_from(&[(CHANCE_TO_ACQUIRE_VAR, "99999999999")]))
        .unwrap_err();
    assert!(err.to_string().contains("too large"));
}

#[test]
fn test_with_acquire_timeout() {
    let config = HarnessConfig::default().with_acquire_timeout(Duration::from_millis(250));
    assert_eq!(config.acquire_timeout, Duration::from_millis(250));
}

#[test]
#[serial]
fn test_from_env_reads_process_environment() {
    // SAFETY: #[serial] keeps other env-touching tests from running concurrently.
    unsafe {
        std::env::set_var(SLEEP_TIME_VAR, "7");
        std::env::set_var(CHANCE_TO_ACQUIRE_VAR, "3");
    }

    let result = HarnessConfig::from_env();

    unsafe {
        std::env::remove_var(SLEEP_TIME_VAR);
        std::env::remove_var(CHANCE_TO_ACQUIRE_VAR);
    }

    let config = result.unwrap();
    assert_eq!(config.sleep_time, Duration::from_secs(7));
    assert_eq!(config.chance_to_acquire, 3);
}

#[test]
#[serial]
fn test_from_env_rejects_malformed_value() {
    unsafe {
        std::env::set_var(CHANCE_TO_ACQUIRE_VAR, "often");
    }

    let result = HarnessConfig::from_env();

    unsafe {
        std::env::remove_var(CHANCE_TO_ACQUIRE_VAR);
    }

    assert!(matches!(result, Err(ContendError::Config(_))));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_from_env_rejects_non_utf8_value() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    unsafe {
        std::env::set_var(SLEEP_TIME_VAR, OsStr::from_bytes(&[0x31, 0xff]));
    }

    let result = HarnessConfig::from_env();

    unsafe {
        std::env::remove_var(SLEEP_TIME_VAR);
    }

    let err = result.unwrap_err();
    assert!(matches!(err, ContendError::Config(_)));
    assert!(err.to_string().contains("SLEEP_TIME"));
}
