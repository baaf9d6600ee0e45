//! Worker event reporting for contend.
//!
//! Every harness iteration produces a structured [`WorkerEvent`] which is handed
//! to an [`EventSink`]. The harness never prints anything itself; narration,
//! NDJSON logs and test assertions are all just sinks.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `worker`: The worker identity (e.g., `Thread1`)
//! - `outcome`: What happened (`acquired`, `releasing`, `blocked`, `timed_out`, `not_gated`)
//! - `random_draw`: The random number drawn for the gate in this iteration

use crate::error::{ContendError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Result of one worker iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Lock obtained; the dwell period starts.
    Acquired,
    /// Dwell period over; emitted while the lock is still held.
    Releasing,
    /// Single attempt found the lock already held.
    Blocked,
    /// Waited for the configured timeout without obtaining the lock.
    TimedOut,
    /// The random draw did not pass the gate; no attempt was made.
    NotGated,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Acquired => write!(f, "acquired"),
            Outcome::Releasing => write!(f, "releasing"),
            Outcome::Blocked => write!(f, "blocked"),
            Outcome::TimedOut => write!(f, "timed_out"),
            Outcome::NotGated => write!(f, "not_gated"),
        }
    }
}

/// A single reported harness event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerEvent {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// Identity of the worker that produced the event.
    pub worker: String,

    pub outcome: Outcome,

    /// The gate draw for the iteration that produced the event.
    pub random_draw: u32,
}

impl WorkerEvent {
    /// Create an event stamped with the current time.
    pub fn new(worker: impl Into<String>, outcome: Outcome, random_draw: u32) -> Self {
        Self {
            ts: Utc::now(),
            worker: worker.into(),
            outcome,
            random_draw,
        }
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ContendError::Event(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Destination for worker events.
///
/// Sinks are shared by all worker threads, hence `Send + Sync`. An error from
/// `emit` stops the worker that produced the event.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &WorkerEvent) -> Result<()>;
}

/// Narrates events through `tracing`, one log line per event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &WorkerEvent) -> Result<()> {
        let worker = event.worker.as_str();
        let random_draw = event.random_draw;
        match event.outcome {
            Outcome::Acquired => {
                tracing::info!(worker, random_draw, outcome = %event.outcome, "acquired the lock")
            }
            Outcome::Releasing => {
                tracing::info!(worker, random_draw, outcome = %event.outcome, "releasing the lock")
            }
            Outcome::Blocked => tracing::info!(
                worker,
                random_draw,
                outcome = %event.outcome,
                "attempted to acquire the lock but it was already held"
            ),
            Outcome::TimedOut => tracing::info!(
                worker,
                random_draw,
                outcome = %event.outcome,
                "gave up waiting for the lock"
            ),
            Outcome::NotGated => tracing::info!(
                worker,
                random_draw,
                outcome = %event.outcome,
                "did not qualify to acquire the lock"
            ),
        }
        Ok(())
    }
}

/// Appends events to an NDJSON file, one object per line.
///
/// The file is created if it doesn't exist and is never truncated.
#[derive(Debug)]
pub struct NdjsonSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl NdjsonSink {
    /// Open (or create) the log at `path` in append mode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                ContendError::io(
                    format!("failed to open events file '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for NdjsonSink {
    fn emit(&self, event: &WorkerEvent) -> Result<()> {
        let json_line = event.to_ndjson_line()?;

        // A poisoned mutex only means another worker panicked mid-write; the
        // file handle itself is still usable.
        let mut file = self
            .file
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        writeln!(file, "{}", json_line).map_err(|e| {
            ContendError::io(
                format!("failed to write event to '{}'", self.path.display()),
                e,
            )
        })
    }
}

/// Forwards every event to each wrapped sink in order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink to the end of the chain.
    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: &WorkerEvent) -> Result<()> {
        for sink in &self.sinks {
            sink.emit(event)?;
        }
        Ok(())
    }
}

/// Test sink that keeps every event along with the instant it arrived.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<(std::time::Instant, WorkerEvent)>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<(std::time::Instant, WorkerEvent)> {
        self.events.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn emit(&self, event: &WorkerEvent) -> Result<()> {
        let mut events = self.events.lock().unwrap();
        events.push((std::time::Instant::now(), event.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_event_creation() {
        let event = WorkerEvent::new("Thread1", Outcome::Acquired, 14);

        assert_eq!(event.worker, "Thread1");
        assert_eq!(event.outcome, Outcome::Acquired);
        assert_eq!(event.random_draw, 14);
        // Timestamp should be recent (within last minute)
        let age = Utc::now().signed_duration_since(event.ts);
        assert!(age.num_minutes() < 1);
    }

    #[test]
    fn test_event_serialization() {
        let event = WorkerEvent::new("Thread2", Outcome::NotGated, 7);
        let json_line = event.to_ndjson_line().unwrap();

        // Should not contain newlines (single line)
        assert!(!json_line.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&json_line).unwrap();
        assert_eq!(parsed["worker"], "Thread2");
        assert_eq!(parsed["outcome"], "not_gated");
        assert_eq!(parsed["random_draw"], 7);
        assert!(parsed["ts"].is_string());
    }

    #[test]
    fn test_outcome_display_matches_serialization() {
        for outcome in [
            Outcome::Acquired,
            Outcome::Releasing,
            Outcome::Blocked,
            Outcome::TimedOut,
            Outcome::NotGated,
        ] {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{}\"", outcome));
        }
    }

    #[test]
    fn test_tracing_sink_accepts_every_outcome() {
        let sink = TracingSink;
        for outcome in [Outcome::Acquired, Outcome::Blocked, Outcome::NotGated] {
            sink.emit(&WorkerEvent::new("Thread3", outcome, 2)).unwrap();
        }
    }

    #[test]
    fn test_ndjson_sink_appends_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("events.ndjson");

        let sink = NdjsonSink::open(&path).unwrap();
        assert_eq!(sink.path(), path);
        sink.emit(&WorkerEvent::new("Thread1", Outcome::Acquired, 4))
            .unwrap();
        sink.emit(&WorkerEvent::new("Thread2", Outcome::Blocked, 8))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: WorkerEvent = serde_json::from_str(lines[0]).unwrap();
        let second: WorkerEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(first.outcome, Outcome::Acquired);
        assert_eq!(second.worker, "Thread2");
    }

    #[test]
    fn test_ndjson_sink_does_not_truncate_existing_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("events.ndjson");

        NdjsonSink::open(&path)
            .unwrap()
            .emit(&WorkerEvent::new("Thread1", Outcome::NotGated, 1))
            .unwrap();
        NdjsonSink::open(&path)
            .unwrap()
            .emit(&WorkerEvent::new("Thread1", Outcome::NotGated, 3))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_ndjson_sink_open_fails_for_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope").join("events.ndjson");

        let err = NdjsonSink::open(&path).unwrap_err();
        assert!(matches!(err, ContendError::Io { .. }));
    }

    #[test]
    fn test_fanout_sink_forwards_to_all() {
        struct Shared(Arc<RecordingSink>);

        impl EventSink for Shared {
            fn emit(&self, event: &WorkerEvent) -> Result<()> {
                self.0.emit(event)
            }
        }

        let a = Arc::new(RecordingSink::default());
        let b = Arc::new(RecordingSink::default());
        let fanout = FanoutSink::new()
            .with(Shared(Arc::clone(&a)))
            .with(Shared(Arc::clone(&b)));

        fanout
            .emit(&WorkerEvent::new("Thread1", Outcome::Releasing, 6))
            .unwrap();

        assert_eq!(a.events().len(), 1);
        assert_eq!(b.events().len(), 1);
        assert_eq!(b.events()[0].1.outcome, Outcome::Releasing);
    }
}
