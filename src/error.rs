//! Error types for contend.
//!
//! Lock contention is not an error: a lock that is already held is reported as
//! `Ok(false)` from acquisition. Only genuine faults end up here.

use crate::exit_codes;
use std::io;
use thiserror::Error;

/// Main error type for contend operations.
#[derive(Error, Debug)]
pub enum ContendError {
    /// Filesystem fault other than "lock file already exists".
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Malformed configuration, detected at startup.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An event could not be serialized or delivered to its sink.
    #[error("Event delivery failed: {0}")]
    Event(String),

    /// A worker thread terminated abnormally.
    #[error("Worker failed: {0}")]
    Worker(String),
}

impl ContendError {
    /// Wrap an I/O error with a human-readable context line.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ContendError::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ContendError::Io { .. } => exit_codes::IO_FAILURE,
            ContendError::Config(_) => exit_codes::CONFIG_ERROR,
            ContendError::Event(_) => exit_codes::IO_FAILURE,
            ContendError::Worker(_) => exit_codes::WORKER_FAILURE,
        }
    }
}

/// Result type alias for contend operations.
pub type Result<T> = std::result::Result<T, ContendError>;
