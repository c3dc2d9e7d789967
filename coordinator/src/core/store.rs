//! Chunk store
//!
//! The single registry of jobs, chunks, workers and results. It is a plain
//! value with no interior locking: one owner (the coordinator task) mutates
//! it, which is what serializes every operation.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Instant;

use shared::{ChunkId, ChunkResult, CoordinatorStats, JobId, WorkChunk, WorkerId};

/// Parameters of a job plus its chunk IDs in creation order
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub id: JobId,
    pub start: u64,
    pub end: u64,
    pub chunk_size: u64,
    pub rounds: u32,
    pub chunk_ids: Vec<ChunkId>,
}

/// Lifecycle of a single chunk
///
/// `Pending -> Assigned -> Completed`, with `Assigned -> Pending` only when the
/// assignment goes stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkStatus {
    Pending,
    Assigned { worker_id: WorkerId, assigned_at: Instant },
    Completed { worker_id: WorkerId },
}

impl ChunkStatus {
    /// Worker named in the assignment record, if any
    pub fn assignee(&self) -> Option<&WorkerId> {
        match self {
            ChunkStatus::Pending => None,
            ChunkStatus::Assigned { worker_id, .. } | ChunkStatus::Completed { worker_id } => {
                Some(worker_id)
            }
        }
    }
}

/// Bookkeeping for one registered worker
#[derive(Debug, Clone)]
pub struct WorkerInfo {
    pub id: WorkerId,
    pub last_contact: Instant,
    pub active_chunks: HashSet<ChunkId>,
    pub completed_count: u64,
}

impl WorkerInfo {
    fn new(id: WorkerId, now: Instant) -> Self {
        Self {
            id,
            last_contact: now,
            active_chunks: HashSet::new(),
            completed_count: 0,
        }
    }
}

#[derive(Debug)]
struct ChunkEntry {
    chunk: WorkChunk,
    status: ChunkStatus,
    /// Global creation order, used to restore queue order on requeue
    sequence: u64,
}

/// Registry of jobs, chunks, workers, results and the pending queue
#[derive(Debug, Default)]
pub struct ChunkStore {
    jobs: HashMap<JobId, JobRecord>,
    chunks: HashMap<ChunkId, ChunkEntry>,
    workers: HashMap<WorkerId, WorkerInfo>,
    results: HashMap<ChunkId, ChunkResult>,
    pending: VecDeque<ChunkId>,
    next_sequence: u64,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Workers
    // ------------------------------------------------------------------

    /// Insert a fresh worker record, replacing any existing one with that ID
    pub fn register_worker(&mut self, worker_id: WorkerId, now: Instant) {
        self.workers.insert(worker_id.clone(), WorkerInfo::new(worker_id, now));
    }

    pub fn worker(&self, worker_id: &WorkerId) -> Option<&WorkerInfo> {
        self.workers.get(worker_id)
    }

    /// Refresh a worker's last contact time; false if it is not registered
    pub fn touch_worker(&mut self, worker_id: &WorkerId, now: Instant) -> bool {
        match self.workers.get_mut(worker_id) {
            Some(worker) => {
                worker.last_contact = now;
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Jobs and chunks
    // ------------------------------------------------------------------

    /// Store a job and queue its chunks in the given order
    pub fn insert_job(&mut self, mut record: JobRecord, chunks: Vec<WorkChunk>) {
        record.chunk_ids = chunks.iter().map(|chunk| chunk.id.clone()).collect();

        for chunk in chunks {
            let sequence = self.next_sequence;
            self.next_sequence += 1;

            self.pending.push_back(chunk.id.clone());
            self.chunks.insert(
                chunk.id.clone(),
                ChunkEntry {
                    chunk,
                    status: ChunkStatus::Pending,
                    sequence,
                },
            );
        }

        self.jobs.insert(record.id.clone(), record);
    }

    pub fn job(&self, job_id: &JobId) -> Option<&JobRecord> {
        self.jobs.get(job_id)
    }

    pub fn chunk_status(&self, chunk_id: &ChunkId) -> Option<&ChunkStatus> {
        self.chunks.get(chunk_id).map(|entry| &entry.status)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    // ------------------------------------------------------------------
    // Assignment
    // ------------------------------------------------------------------

    /// Pop the head of the pending queue and assign it to `worker_id`
    ///
    /// The worker must be registered; returns `None` when the queue is empty.
    pub fn assign_next(&mut self, worker_id: &WorkerId, now: Instant) -> Option<WorkChunk> {
        let worker = self.workers.get_mut(worker_id)?;
        let chunk_id = self.pending.pop_front()?;
        // The queue only ever holds IDs of stored chunks
        let entry = self.chunks.get_mut(&chunk_id)?;

        entry.status = ChunkStatus::Assigned {
            worker_id: worker_id.clone(),
            assigned_at: now,
        };
        worker.active_chunks.insert(chunk_id);

        Some(entry.chunk.clone())
    }

    /// Store a result and mark its chunk completed by `worker_id`
    ///
    /// Overwrites any earlier result for the same chunk. The chunk leaves every
    /// active set it is in, and each worker it left gets its completed count
    /// bumped.
    pub fn record_result(&mut self, worker_id: &WorkerId, result: ChunkResult) {
        let chunk_id = result.chunk_id.clone();

        if let Some(entry) = self.chunks.get_mut(&chunk_id) {
            entry.status = ChunkStatus::Completed {
                worker_id: worker_id.clone(),
            };
        }

        for worker in self.workers.values_mut() {
            if worker.active_chunks.remove(&chunk_id) {
                worker.completed_count += 1;
            }
        }

        self.results.insert(chunk_id, result);
    }

    pub fn result(&self, chunk_id: &ChunkId) -> Option<&ChunkResult> {
        self.results.get(chunk_id)
    }

    /// Concatenate the submitted primes of a job in chunk-creation order
    pub fn collect_primes(&self, job_id: &JobId) -> Vec<u64> {
        let Some(job) = self.jobs.get(job_id) else {
            return Vec::new();
        };

        job.chunk_ids
            .iter()
            .filter_map(|chunk_id| self.results.get(chunk_id))
            .flat_map(|result| result.primes.iter().copied())
            .collect()
    }

    /// Assigned chunks with their assignee's ID and assignment time
    pub fn assignments(&self) -> impl Iterator<Item = (&ChunkId, &WorkerId, Instant)> {
        self.chunks.iter().filter_map(|(id, entry)| match &entry.status {
            ChunkStatus::Assigned { worker_id, assigned_at } => Some((id, worker_id, *assigned_at)),
            _ => None,
        })
    }

    /// Move assigned chunks back to the head of the pending queue
    ///
    /// Requeued chunks keep their relative creation order and are handed out
    /// before anything that was already waiting. IDs that are not currently
    /// assigned are ignored. Returns how many chunks moved.
    pub fn requeue(&mut self, chunk_ids: &[ChunkId]) -> usize {
        let mut reclaimed: Vec<(u64, ChunkId)> = Vec::new();

        for chunk_id in chunk_ids {
            let Some(entry) = self.chunks.get_mut(chunk_id) else {
                continue;
            };
            let ChunkStatus::Assigned { worker_id, .. } = &entry.status else {
                continue;
            };

            if let Some(worker) = self.workers.get_mut(worker_id) {
                worker.active_chunks.remove(chunk_id);
            }
            entry.status = ChunkStatus::Pending;
            reclaimed.push((entry.sequence, chunk_id.clone()));
        }

        reclaimed.sort_by_key(|(sequence, _)| *sequence);
        let count = reclaimed.len();
        for (_, chunk_id) in reclaimed.into_iter().rev() {
            self.pending.push_front(chunk_id);
        }
        count
    }

    pub fn stats(&self) -> CoordinatorStats {
        let mut stats = CoordinatorStats {
            jobs: self.jobs.len(),
            workers: self.workers.len(),
            pending_chunks: self.pending.len(),
            ..Default::default()
        };

        for entry in self.chunks.values() {
            match entry.status {
                ChunkStatus::Pending => {}
                ChunkStatus::Assigned { .. } => stats.assigned_chunks += 1,
                ChunkStatus::Completed { .. } => stats.completed_chunks += 1,
            }
        }
        stats
    }
}
