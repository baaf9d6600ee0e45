//! Contend: a cross-process file lock and a harness that hammers it.
//!
//! This is the main entry point for the `contend` CLI. It reads configuration,
//! starts the workers, waits for Ctrl-C (or the optional run limit), shuts the
//! workers down cooperatively and maps errors to exit codes.

mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod harness;
pub mod locks;

use cli::Cli;
use config::HarnessConfig;
use error::{ContendError, Result};
use events::{FanoutSink, NdjsonSink, TracingSink};
use harness::{Harness, RunSummary, StopToken};
use std::process::ExitCode;
use std::time::Duration;
use tokio::task::JoinError;

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::from(exit_codes::SUCCESS as u8)
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("contend=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .init();
}

fn run(cli: Cli) -> Result<RunSummary> {
    // Environment is read exactly once, before any worker starts.
    let config = HarnessConfig::from_env()?.with_acquire_timeout(cli.acquire_timeout());

    let mut sink = FanoutSink::new().with(TracingSink);
    if let Some(path) = &cli.events {
        let events = NdjsonSink::open(path)?;
        tracing::info!(path = %events.path().display(), "appending events as NDJSON");
        sink = sink.with(events);
    }

    let run_limit = cli.run_limit();
    let harness = Harness::new(cli.lock, cli.workers, config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ContendError::io("failed to start runtime", e))?;

    runtime.block_on(supervise(harness, sink, run_limit))
}

/// Why the supervisor stopped waiting.
enum Shutdown {
    Finished(std::result::Result<Result<RunSummary>, JoinError>),
    Interrupted(std::io::Result<()>),
    LimitReached,
}

/// Run the harness on the blocking pool and stop it on Ctrl-C or at the limit.
async fn supervise(
    harness: Harness,
    sink: FanoutSink,
    run_limit: Option<Duration>,
) -> Result<RunSummary> {
    let stop = StopToken::new();
    let worker_stop = stop.clone();
    let mut workers = tokio::task::spawn_blocking(move || harness.run(&worker_stop, &sink));

    let limit = async move {
        match run_limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    let shutdown = tokio::select! {
        joined = &mut workers => Shutdown::Finished(joined),
        signal = tokio::signal::ctrl_c() => Shutdown::Interrupted(signal),
        () = limit => Shutdown::LimitReached,
    };

    let signal_error = match shutdown {
        Shutdown::Finished(joined) => return flatten(joined),
        Shutdown::Interrupted(Ok(())) => {
            tracing::info!("interrupt received, terminating workers");
            None
        }
        Shutdown::Interrupted(Err(e)) => Some(e),
        Shutdown::LimitReached => {
            tracing::info!("run limit reached, terminating workers");
            None
        }
    };

    stop.cancel();
    let summary = flatten(workers.await)?;

    match signal_error {
        Some(e) => Err(ContendError::io("failed to listen for Ctrl-C", e)),
        None => Ok(summary),
    }
}

fn flatten(joined: std::result::Result<Result<RunSummary>, JoinError>) -> Result<RunSummary> {
    joined.map_err(|e| ContendError::Worker(format!("harness task failed: {}", e)))?
}
