//! Spawning, joining and summarising workers.

use super::stop::StopToken;
use super::worker::Worker;
use crate::config::HarnessConfig;
use crate::error::{ContendError, Result};
use crate::events::{EventSink, Outcome};
use crate::locks::lock_path_for;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread;

/// Per-outcome iteration counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub acquired: u64,
    pub blocked: u64,
    pub timed_out: u64,
    pub not_gated: u64,
}

impl RunSummary {
    /// Count one finished iteration.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Acquired => self.acquired += 1,
            Outcome::Blocked => self.blocked += 1,
            Outcome::TimedOut => self.timed_out += 1,
            Outcome::NotGated => self.not_gated += 1,
            // Not an iteration result; the matching `Acquired` is counted.
            Outcome::Releasing => {}
        }
    }

    pub fn merge(&mut self, other: &RunSummary) {
        self.acquired += other.acquired;
        self.blocked += other.blocked;
        self.timed_out += other.timed_out;
        self.not_gated += other.not_gated;
    }

    pub fn iterations(&self) -> u64 {
        self.acquired + self.blocked + self.timed_out + self.not_gated
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} iterations: {} acquired, {} blocked, {} timed out, {} not gated",
            self.iterations(),
            self.acquired,
            self.blocked,
            self.timed_out,
            self.not_gated
        )
    }
}

/// A set of named workers contending for one lock file.
#[derive(Debug, Clone)]
pub struct Harness {
    lock_target: PathBuf,
    names: Vec<String>,
    config: HarnessConfig,
}

impl Harness {
    /// Create a harness; nothing runs until [`run`](Self::run).
    pub fn new<I, S>(lock_target: impl Into<PathBuf>, names: I, config: HarnessConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lock_target: lock_target.into(),
            names: names.into_iter().map(Into::into).collect(),
            config,
        }
    }

    pub fn lock_target(&self) -> &Path {
        &self.lock_target
    }

    /// Run every worker until `stop` is cancelled, then join them all.
    ///
    /// A worker that hits a fault cancels `stop` itself so the remaining
    /// workers wind down at their next loop boundary.
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - All workers stopped cleanly
    /// * `Err(_)` - The first fault reported by any worker, after every
    ///   worker has been joined
    pub fn run(&self, stop: &StopToken, sink: &dyn EventSink) -> Result<RunSummary> {
        tracing::info!(
            workers = self.names.len(),
            lock = %lock_path_for(&self.lock_target).display(),
            sleep_time_secs = self.config.sleep_time.as_secs(),
            chance_to_acquire = self.config.chance_to_acquire,
            "starting workers"
        );

        let mut summary = RunSummary::default();
        let mut first_error: Option<ContendError> = None;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.names.len());

            for name in &self.names {
                let worker = Worker::new(name, &self.lock_target, &self.config, stop, sink);
                let spawned = thread::Builder::new()
                    .name(name.clone())
                    .spawn_scoped(scope, move || {
                        let result = panic::catch_unwind(AssertUnwindSafe(|| worker.run()))
                            .unwrap_or_else(|_| {
                                Err(ContendError::Worker(format!(
                                    "worker '{}' panicked",
                                    worker.name
                                )))
                            });
                        if result.is_err() {
                            stop.cancel();
                        }
                        result
                    });

                match spawned {
                    Ok(handle) => handles.push((name, handle)),
                    Err(e) => {
                        stop.cancel();
                        first_error.get_or_insert(ContendError::io(
                            format!("failed to spawn worker '{}'", name),
                            e,
                        ));
                        break;
                    }
                }
            }

            for (name, handle) in handles {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(ContendError::Worker(format!("worker '{}' panicked", name)))
                });
                match result {
                    Ok(counts) => summary.merge(&counts),
                    Err(e) => {
                        tracing::error!(worker = %name, "worker stopped: {}", e);
                        first_error.get_or_insert(e);
                    }
                }
            }
        });

        match first_error {
            Some(e) => Err(e),
            None => {
                tracing::info!("all workers stopped ({})", summary);
                Ok(summary)
            }
        }
    }
}
