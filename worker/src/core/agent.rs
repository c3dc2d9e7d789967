//! Pull, compute, submit loop

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::time;

use shared::{process_info, process_warn, ChunkResult, ProcessId, WorkChunk, WorkerId};
use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::traits::{AlgorithmProvider, CoordinatorClient};

/// What a finished run accomplished
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub chunks_processed: usize,
    pub primes_found: usize,
}

/// Worker agent with dependency injection
pub struct WorkerAgent<C, P>
where
    C: CoordinatorClient,
    P: AlgorithmProvider + 'static,
{
    client: C,
    provider: Arc<P>,
    config: WorkerConfig,
    worker_id: Option<WorkerId>,
}

impl<C, P> WorkerAgent<C, P>
where
    C: CoordinatorClient,
    P: AlgorithmProvider + 'static,
{
    pub fn new(client: C, provider: P, config: WorkerConfig) -> Self {
        Self {
            client,
            provider: Arc::new(provider),
            config,
            worker_id: None,
        }
    }

    /// ID handed out by the coordinator, once registered
    pub fn worker_id(&self) -> Option<&WorkerId> {
        self.worker_id.as_ref()
    }

    /// Register with the coordinator, re-using the configured ID if there is one
    pub async fn register(&mut self) -> WorkerResult<WorkerId> {
        let worker_id = self.client.register(self.config.worker_id.clone()).await?;
        process_info!(ProcessId::current(), "🤝 Registered as {}", worker_id);
        self.worker_id = Some(worker_id.clone());
        Ok(worker_id)
    }

    /// Work until the queue is empty or `shutdown` turns true
    ///
    /// Shutdown is only checked before pulling, so a chunk that was handed out
    /// is always computed and submitted. Any error ends the run.
    pub async fn run(&mut self, shutdown: watch::Receiver<bool>) -> WorkerResult<RunSummary> {
        let worker_id = match self.worker_id.clone() {
            Some(id) => id,
            None => self.register().await?,
        };
        let mut summary = RunSummary::default();

        loop {
            if *shutdown.borrow() {
                process_info!(
                    ProcessId::current(),
                    "🛑 Shutdown requested, not pulling more work"
                );
                break;
            }

            let Some(chunk) = self.client.next_chunk(&worker_id).await? else {
                process_info!(ProcessId::current(), "📭 Queue is empty");
                break;
            };

            let chunk_id = chunk.id.clone();
            let result = self.process_chunk(chunk).await?;
            let found = result.primes.len();
            self.client.submit_result(&worker_id, result).await?;

            summary.chunks_processed += 1;
            summary.primes_found += found;
            process_info!(
                ProcessId::current(),
                "📤 Submitted {} with {} prime(s)",
                chunk_id,
                found
            );
        }

        Ok(summary)
    }

    /// Compute one chunk on the blocking pool, heartbeating while it runs
    pub async fn process_chunk(&self, chunk: WorkChunk) -> WorkerResult<ChunkResult> {
        process_info!(
            ProcessId::current(),
            "🔢 Computing {} [{}, {}] with {}",
            chunk.id,
            chunk.start,
            chunk.end,
            chunk.algorithm
        );

        let provider = Arc::clone(&self.provider);
        let (start, end, algorithm) = (chunk.start, chunk.end, chunk.algorithm);
        let started = Instant::now();
        let mut compute =
            tokio::task::spawn_blocking(move || provider.primes_in_range(start, end, algorithm));

        // interval_at panics on a zero period
        let period = self.config.heartbeat_interval.max(Duration::from_millis(1));
        let mut heartbeat = time::interval_at(time::Instant::now() + period, period);

        let primes = loop {
            tokio::select! {
                joined = &mut compute => break joined??,
                _ = heartbeat.tick() => self.send_heartbeat().await,
            }
        };

        Ok(ChunkResult {
            chunk_id: chunk.id,
            primes,
            compute_duration: started.elapsed(),
        })
    }

    /// Heartbeat failures only warn; the submission reports any real problem
    async fn send_heartbeat(&self) {
        let Some(worker_id) = &self.worker_id else {
            return;
        };
        if let Err(e) = self.client.heartbeat(worker_id).await {
            process_warn!(ProcessId::current(), "💔 Heartbeat failed: {}", e);
        }
    }
}
