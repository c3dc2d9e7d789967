//! Main entry point for the coordinator binary

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;

use coordinator::{
    api::{build_router, ApiState},
    config::{DEFAULT_CHUNK_SIZE, DEFAULT_THRESHOLD},
    ChunkStore, Coordinator, CoordinatorConfig, CoordinatorError, CoordinatorResult,
    CoordinatorService,
};
use shared::{logging, process_info, ProcessId};

/// Coordinator that splits prime range searches into chunks for pull-based workers
#[derive(Parser, Debug)]
#[command(name = "coordinator")]
#[command(about = "Distributes prime range chunks to workers and collects their results")]
struct Args {
    /// HTTP bind address
    #[arg(long, env = "PRIME_COORDINATOR_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Chunk size used when a job asks for a non-positive one
    #[arg(long, env = "PRIME_DEFAULT_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    default_chunk_size: u64,

    /// Ranges fully below this value use the sieve, others Miller-Rabin
    #[arg(long, env = "PRIME_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    threshold: u64,

    /// Maximum number of chunks a single job may produce
    #[arg(long, env = "PRIME_MAX_CHUNKS_PER_JOB", default_value = "1000000")]
    max_chunks_per_job: usize,

    /// Seconds of silence after which a worker's chunks are requeued
    #[arg(long, env = "PRIME_WORKER_TIMEOUT_SECS", default_value = "300")]
    worker_timeout_secs: u64,

    /// Seconds between stale-assignment sweeps
    #[arg(long, env = "PRIME_SWEEP_INTERVAL_SECS", default_value = "15")]
    sweep_interval_secs: u64,

    /// Request buffer of the coordinator task
    #[arg(long, env = "PRIME_CHANNEL_BUFFER", default_value = "256")]
    channel_buffer: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PRIME_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> CoordinatorConfig {
        CoordinatorConfig {
            bind_address: self.bind,
            default_chunk_size: self.default_chunk_size,
            threshold: self.threshold,
            max_chunks_per_job: self.max_chunks_per_job,
            worker_timeout: Duration::from_secs(self.worker_timeout_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs),
            channel_buffer: self.channel_buffer,
        }
    }
}

#[tokio::main]
async fn main() -> CoordinatorResult<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    ProcessId::init_coordinator();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = args.into_config();
    config.validate()?;
    logging::log_startup(ProcessId::current(), "prime range coordinator");
    process_info!(
        ProcessId::current(),
        "⚙️ threshold={} default_chunk_size={} worker_timeout={:?} sweep_interval={:?}",
        config.threshold,
        config.default_chunk_size,
        config.worker_timeout,
        config.sweep_interval
    );

    // The store is created here and handed to the coordinator task for its whole lifetime
    let coordinator = Coordinator::new(config.clone(), ChunkStore::new());
    let (handle, task) = CoordinatorService::spawn(coordinator);

    let router = build_router(ApiState::new(handle, config.clone()));
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    process_info!(ProcessId::current(), "🌐 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Router (and with it every handle) is gone; the task hands the state back
    let coordinator = task
        .await
        .map_err(|e| CoordinatorError::IoError { message: e.to_string() })?;
    let stats = coordinator.stats();
    logging::log_success(
        ProcessId::current(),
        &format!(
            "Stopped with {} job(s), {} worker(s), {} chunk(s) done, {} assigned, {} pending",
            stats.jobs,
            stats.workers,
            stats.completed_chunks,
            stats.assigned_chunks,
            stats.pending_chunks
        ),
    );
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal"),
        Err(err) => logging::log_error(ProcessId::current(), "Signal handling", &err),
    }
}
