//! CLI argument parsing for contend.
//!
//! Uses clap derive macros for declarative argument definitions. Timing knobs
//! (`SLEEP_TIME`, `CHANCE_TO_ACQUIRE`) come from the environment instead; see
//! the `config` module.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Contend: run several workers against one file lock and report who gets it.
///
/// Each worker repeatedly draws a random number, and when the draw passes the
/// gate makes a single attempt to create `<lock>.lock`. A worker that gets the
/// lock holds it for SLEEP_TIME seconds. Press Ctrl-C to stop; every worker
/// finishes its current iteration and releases before the process exits.
#[derive(Parser, Debug)]
#[command(name = "contend")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Resource to lock. `.lock` is appended unless already present.
    #[arg(long, default_value = "example.lock")]
    pub lock: PathBuf,

    /// Worker identities, comma-separated.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "Thread1,Thread2,Thread3"
    )]
    pub workers: Vec<String>,

    /// Stop on our own after this many seconds instead of waiting for Ctrl-C.
    #[arg(long, value_name = "SECS")]
    pub duration: Option<u64>,

    /// How long each acquisition attempt may wait, in milliseconds.
    /// Zero means a single attempt.
    #[arg(long, value_name = "MS", default_value_t = 0)]
    pub timeout_ms: u64,

    /// Also append every event as NDJSON to this file.
    #[arg(long, value_name = "PATH")]
    pub events: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn run_limit(&self) -> Option<Duration> {
        self.duration.map(Duration::from_secs)
    }
}
