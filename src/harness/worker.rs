//! The per-thread worker loop.

use super::runner::RunSummary;
use super::stop::StopToken;
use crate::config::HarnessConfig;
use crate::error::Result;
use crate::events::{EventSink, Outcome, WorkerEvent};
use crate::locks::FileLock;
use rand::Rng;
use std::path::Path;
use std::thread;

/// Smallest possible gate draw.
pub const DRAW_MIN: u32 = 1;

/// Largest possible gate draw.
pub const DRAW_MAX: u32 = 25;

/// Whether a draw qualifies for an acquisition attempt.
///
/// `chance` must be non-zero; [`HarnessConfig::validate`] guarantees that.
pub fn is_gated_in(draw: u32, chance: u32) -> bool {
    draw % chance == 0
}

/// One worker identity and everything it borrows from the harness.
pub(super) struct Worker<'a> {
    pub(super) name: &'a str,
    lock_target: &'a Path,
    config: &'a HarnessConfig,
    stop: &'a StopToken,
    sink: &'a dyn EventSink,
}

impl<'a> Worker<'a> {
    pub(super) fn new(
        name: &'a str,
        lock_target: &'a Path,
        config: &'a HarnessConfig,
        stop: &'a StopToken,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            name,
            lock_target,
            config,
            stop,
            sink,
        }
    }

    /// Loop until the stop token is cancelled or a fault occurs.
    pub(super) fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut rng = rand::thread_rng();

        tracing::debug!(worker = self.name, "worker started");
        while !self.stop.is_cancelled() {
            let draw = rng.gen_range(DRAW_MIN..=DRAW_MAX);
            summary.record(self.iterate(draw)?);
            thread::sleep(self.config.idle_interval);
        }
        tracing::debug!(worker = self.name, "worker stopped");

        Ok(summary)
    }

    /// Run a single iteration for `draw` and report what happened.
    pub(super) fn iterate(&self, draw: u32) -> Result<Outcome> {
        if !is_gated_in(draw, self.config.chance_to_acquire) {
            self.emit(Outcome::NotGated, draw)?;
            return Ok(Outcome::NotGated);
        }

        let mut lock = FileLock::new(self.lock_target).with_timeout(self.config.acquire_timeout);
        let held = lock.with_lock(|| {
            self.emit(Outcome::Acquired, draw)?;
            thread::sleep(self.config.sleep_time);
            // Reported before the file is removed so that recorded hold
            // windows never extend past the real one.
            self.emit(Outcome::Releasing, draw)
        })?;

        match held {
            Some(body) => {
                body?;
                Ok(Outcome::Acquired)
            }
            None => {
                let outcome = if self.config.acquire_timeout.is_zero() {
                    Outcome::Blocked
                } else {
                    Outcome::TimedOut
                };
                self.emit(outcome, draw)?;
                Ok(outcome)
            }
        }
    }

    fn emit(&self, outcome: Outcome, draw: u32) -> Result<()> {
        self.sink.emit(&WorkerEvent::new(self.name, outcome, draw))
    }
}
