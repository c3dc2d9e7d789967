//! Coordinator task and its handle
//!
//! The [`Coordinator`] is moved into a single task that processes requests one
//! at a time from a bounded channel. Every caller (HTTP handlers, tests) goes
//! through a cloneable [`CoordinatorHandle`] and awaits a oneshot reply, so
//! operations are serialized without a lock and nothing blocks on I/O while
//! the store is being mutated. The same task runs the stale-assignment sweep.

use std::time::Duration;

use shared::{
    logging, process_debug, ChunkResult, CoordinatorStats, JobId, JobStatus, ProcessId, WorkChunk,
    WorkerId,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::coordinator::Coordinator;
use crate::error::{CoordinatorError, CoordinatorResult};

/// Requests processed by the coordinator task
#[derive(Debug)]
pub enum CoordinatorRequest {
    RegisterWorker {
        worker_id: WorkerId,
        reply: oneshot::Sender<()>,
    },
    CreateJob {
        start: u64,
        end: u64,
        rounds: u32,
        chunk_size: u64,
        reply: oneshot::Sender<CoordinatorResult<JobId>>,
    },
    NextChunk {
        worker_id: WorkerId,
        reply: oneshot::Sender<CoordinatorResult<Option<WorkChunk>>>,
    },
    SubmitResult {
        worker_id: WorkerId,
        result: ChunkResult,
        reply: oneshot::Sender<CoordinatorResult<()>>,
    },
    Heartbeat {
        worker_id: WorkerId,
        reply: oneshot::Sender<CoordinatorResult<()>>,
    },
    JobResults {
        job_id: JobId,
        reply: oneshot::Sender<Vec<u64>>,
    },
    JobStatus {
        job_id: JobId,
        reply: oneshot::Sender<CoordinatorResult<JobStatus>>,
    },
    Stats {
        reply: oneshot::Sender<CoordinatorStats>,
    },
}

/// Cloneable client of the coordinator task
#[derive(Clone, Debug)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<CoordinatorRequest>,
}

impl CoordinatorHandle {
    /// Send a request and wait for its reply
    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> CoordinatorRequest,
    ) -> CoordinatorResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| CoordinatorError::Unavailable)?;
        reply_rx.await.map_err(|_| CoordinatorError::Unavailable)
    }

    pub async fn register_worker(&self, worker_id: WorkerId) -> CoordinatorResult<()> {
        self.call(|reply| CoordinatorRequest::RegisterWorker { worker_id, reply })
            .await
    }

    pub async fn create_job(
        &self,
        start: u64,
        end: u64,
        rounds: u32,
        chunk_size: u64,
    ) -> CoordinatorResult<JobId> {
        self.call(|reply| CoordinatorRequest::CreateJob {
            start,
            end,
            rounds,
            chunk_size,
            reply,
        })
        .await?
    }

    pub async fn get_next_chunk(
        &self,
        worker_id: WorkerId,
    ) -> CoordinatorResult<Option<WorkChunk>> {
        self.call(|reply| CoordinatorRequest::NextChunk { worker_id, reply })
            .await?
    }

    pub async fn submit_result(
        &self,
        worker_id: WorkerId,
        result: ChunkResult,
    ) -> CoordinatorResult<()> {
        self.call(|reply| CoordinatorRequest::SubmitResult {
            worker_id,
            result,
            reply,
        })
        .await?
    }

    pub async fn heartbeat(&self, worker_id: WorkerId) -> CoordinatorResult<()> {
        self.call(|reply| CoordinatorRequest::Heartbeat { worker_id, reply })
            .await?
    }

    pub async fn get_results(&self, job_id: JobId) -> CoordinatorResult<Vec<u64>> {
        self.call(|reply| CoordinatorRequest::JobResults { job_id, reply })
            .await
    }

    pub async fn job_status(&self, job_id: JobId) -> CoordinatorResult<JobStatus> {
        self.call(|reply| CoordinatorRequest::JobStatus { job_id, reply })
            .await?
    }

    pub async fn stats(&self) -> CoordinatorResult<CoordinatorStats> {
        self.call(|reply| CoordinatorRequest::Stats { reply }).await
    }
}

/// The task that owns the coordinator state
pub struct CoordinatorService {
    coordinator: Coordinator,
    rx: mpsc::Receiver<CoordinatorRequest>,
}

impl CoordinatorService {
    /// Create the task state and the first handle to it
    pub fn new(coordinator: Coordinator) -> (Self, CoordinatorHandle) {
        let (tx, rx) = mpsc::channel(coordinator.config().channel_buffer.max(1));
        (Self { coordinator, rx }, CoordinatorHandle { tx })
    }

    /// Spawn the task on the current runtime
    ///
    /// The join handle yields the coordinator back once every handle is
    /// dropped, so callers can report final statistics.
    pub fn spawn(coordinator: Coordinator) -> (CoordinatorHandle, JoinHandle<Coordinator>) {
        let (service, handle) = Self::new(coordinator);
        (handle, tokio::spawn(service.run()))
    }

    /// Process requests until all handles are gone
    pub async fn run(mut self) -> Coordinator {
        let period = self.coordinator.config().sweep_interval.max(Duration::from_millis(1));
        let mut sweep = time::interval_at(Instant::now() + period, period);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        logging::log_startup(ProcessId::current(), "coordinator task");

        loop {
            tokio::select! {
                request = self.rx.recv() => {
                    match request {
                        Some(request) => self.handle(request),
                        None => break,
                    }
                }

                _ = sweep.tick() => {
                    self.coordinator.requeue_stale(std::time::Instant::now());
                }
            }
        }

        logging::log_shutdown(ProcessId::current(), "all coordinator handles dropped");
        self.coordinator
    }

    fn handle(&mut self, request: CoordinatorRequest) {
        // A dropped reply receiver only means the caller went away
        match request {
            CoordinatorRequest::RegisterWorker { worker_id, reply } => {
                self.coordinator.register_worker(worker_id);
                let _ = reply.send(());
            }
            CoordinatorRequest::CreateJob {
                start,
                end,
                rounds,
                chunk_size,
                reply,
            } => {
                let _ = reply.send(self.coordinator.create_job(start, end, rounds, chunk_size));
            }
            CoordinatorRequest::NextChunk { worker_id, reply } => {
                let _ = reply.send(self.coordinator.get_next_chunk(&worker_id));
            }
            CoordinatorRequest::SubmitResult {
                worker_id,
                result,
                reply,
            } => {
                let _ = reply.send(self.coordinator.submit_result(&worker_id, result));
            }
            CoordinatorRequest::Heartbeat { worker_id, reply } => {
                let outcome = self.coordinator.heartbeat(&worker_id);
                if outcome.is_ok() {
                    process_debug!(ProcessId::current(), "💓 Heartbeat from {}", worker_id);
                }
                let _ = reply.send(outcome);
            }
            CoordinatorRequest::JobResults { job_id, reply } => {
                let _ = reply.send(self.coordinator.get_results(&job_id));
            }
            CoordinatorRequest::JobStatus { job_id, reply } => {
                let _ = reply.send(self.coordinator.job_status(&job_id));
            }
            CoordinatorRequest::Stats { reply } => {
                let _ = reply.send(self.coordinator.stats());
            }
        }
    }
}
