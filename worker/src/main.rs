//! Worker binary entry point

use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;

use shared::{logging, process_error, process_info, ProcessId, WorkerId};
use worker::{HttpCoordinatorClient, RealAlgorithmProvider, WorkerAgent, WorkerConfig, WorkerResult};

#[derive(Parser, Debug)]
#[command(name = "worker")]
#[command(about = "Pulls prime range chunks from the coordinator and submits the primes found")]
struct Args {
    /// Coordinator base URL
    #[arg(long, env = "PRIME_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Worker index used as the log label
    #[arg(long, env = "PRIME_WORKER_INDEX", default_value = "0")]
    index: u32,

    /// Re-register under an existing worker ID
    #[arg(long, env = "PRIME_WORKER_ID")]
    worker_id: Option<String>,

    /// Seconds between heartbeats while computing
    #[arg(long, env = "PRIME_HEARTBEAT_SECS", default_value = "30")]
    heartbeat_secs: u64,

    /// Timeout in seconds for each coordinator request
    #[arg(long, env = "PRIME_REQUEST_TIMEOUT_SECS", default_value = "30")]
    request_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PRIME_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> WorkerConfig {
        WorkerConfig {
            server_url: self.server,
            index: self.index,
            worker_id: self.worker_id.map(WorkerId::from),
            heartbeat_interval: Duration::from_secs(self.heartbeat_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[tokio::main]
async fn main() -> WorkerResult<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    ProcessId::init_worker(args.index);
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = args.into_config();
    config.validate()?;
    logging::log_startup(ProcessId::current(), &format!("prime worker for {}", config.server_url));

    let client = HttpCoordinatorClient::from_config(&config)?;
    let mut agent = WorkerAgent::new(client, RealAlgorithmProvider::new(), config);

    // Ctrl+C stops the next pull; the chunk in hand still gets submitted
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal");
            let _ = shutdown_tx.send(true);
        }
    });

    agent.register().await?;
    let outcome = agent.run(shutdown_rx).await;
    match outcome {
        Ok(summary) => {
            process_info!(
                ProcessId::current(),
                "🏁 Processed {} chunk(s), found {} prime(s)",
                summary.chunks_processed,
                summary.primes_found
            );
            Ok(())
        }
        Err(e) => {
            process_error!(
                ProcessId::current(),
                "❌ Run ended after an error, worker {}: {}",
                agent.worker_id().map(|id| id.as_str()).unwrap_or("unregistered"),
                e
            );
            Err(e)
        }
    }
}
