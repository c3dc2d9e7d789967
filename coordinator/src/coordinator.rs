//! Coordinator operations
//!
//! Owns the [`ChunkStore`] together with the configuration and implements
//! every job/worker operation on top of it. All methods are synchronous and
//! take `&mut self`; the [`crate::service`] task is what gives callers
//! concurrent access.

use std::time::Instant;

use shared::{
    process_debug, process_info, validate_range, ChunkResult, CoordinatorStats, JobId, JobStatus,
    ProcessId, WorkChunk, WorkerId,
};

use crate::config::CoordinatorConfig;
use crate::core::{chunk_count, plan_chunks, ChunkStatus, ChunkStore, JobRecord};
use crate::error::{CoordinatorError, CoordinatorResult};

pub struct Coordinator {
    config: CoordinatorConfig,
    store: ChunkStore,
}

impl Coordinator {
    /// Build a coordinator around an explicitly constructed store
    pub fn new(config: CoordinatorConfig, store: ChunkStore) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Register a worker, resetting its record if the ID is already known
    pub fn register_worker(&mut self, worker_id: WorkerId) {
        if self.store.worker(&worker_id).is_some() {
            process_info!(
                ProcessId::current(),
                "🔁 Worker {} re-registered, record reset",
                worker_id
            );
        } else {
            process_info!(ProcessId::current(), "👷 Worker {} registered", worker_id);
        }
        self.store.register_worker(worker_id, Instant::now());
    }

    /// Split `[start, end]` into chunks and queue them
    ///
    /// Everything is validated before the store is touched, so a rejected job
    /// leaves no chunks behind.
    pub fn create_job(
        &mut self,
        start: u64,
        end: u64,
        rounds: u32,
        chunk_size: u64,
    ) -> CoordinatorResult<JobId> {
        validate_range(start, end)?;
        if chunk_size == 0 {
            return Err(CoordinatorError::invalid_range("chunk size must be positive"));
        }

        let count = chunk_count(start, end, chunk_size);
        if count > self.config.max_chunks_per_job as u64 {
            return Err(CoordinatorError::invalid_range(format!(
                "job would produce {count} chunks, limit is {}",
                self.config.max_chunks_per_job
            )));
        }

        let job_id = JobId::generate();
        let chunks = plan_chunks(&job_id, start, end, chunk_size, rounds, self.config.threshold);
        let deterministic = chunks.iter().filter(|c| c.algorithm.is_deterministic()).count();

        process_info!(
            ProcessId::current(),
            "📋 Job {} created: [{}, {}] in {} chunks ({} sieve, {} miller-rabin)",
            job_id,
            start,
            end,
            chunks.len(),
            deterministic,
            chunks.len() - deterministic
        );

        let record = JobRecord {
            id: job_id.clone(),
            start,
            end,
            chunk_size,
            rounds,
            chunk_ids: Vec::new(),
        };
        self.store.insert_job(record, chunks);

        Ok(job_id)
    }

    /// Hand the head of the pending queue to `worker_id`
    ///
    /// `Ok(None)` means there is nothing left to do right now.
    pub fn get_next_chunk(&mut self, worker_id: &WorkerId) -> CoordinatorResult<Option<WorkChunk>> {
        let now = Instant::now();
        if !self.store.touch_worker(worker_id, now) {
            return Err(CoordinatorError::UnknownWorker {
                worker_id: worker_id.clone(),
            });
        }

        let chunk = self.store.assign_next(worker_id, now);
        match &chunk {
            Some(chunk) => process_debug!(
                ProcessId::current(),
                "📤 Chunk {} [{}, {}] -> {}",
                chunk.id,
                chunk.start,
                chunk.end,
                worker_id
            ),
            None => process_debug!(ProcessId::current(), "📭 No pending chunk for {}", worker_id),
        }
        Ok(chunk)
    }

    /// Record a worker's result for a chunk
    ///
    /// The submitter must be the worker named in the chunk's assignment record.
    /// A completed chunk can be resubmitted by that worker, which overwrites
    /// the stored result.
    pub fn submit_result(
        &mut self,
        worker_id: &WorkerId,
        result: ChunkResult,
    ) -> CoordinatorResult<()> {
        if !self.store.touch_worker(worker_id, Instant::now()) {
            return Err(CoordinatorError::UnknownWorker {
                worker_id: worker_id.clone(),
            });
        }

        let status = self
            .store
            .chunk_status(&result.chunk_id)
            .ok_or_else(|| CoordinatorError::UnknownChunk {
                chunk_id: result.chunk_id.clone(),
            })?;

        if status.assignee() != Some(worker_id) {
            return Err(CoordinatorError::NotAssigned {
                chunk_id: result.chunk_id.clone(),
                worker_id: worker_id.clone(),
            });
        }
        let resubmission = matches!(status, ChunkStatus::Completed { .. });

        process_debug!(
            ProcessId::current(),
            "📥 Result for {} from {}: {} primes in {:?}{}",
            result.chunk_id,
            worker_id,
            result.primes.len(),
            result.compute_duration,
            if resubmission { " (overwrites earlier result)" } else { "" }
        );

        self.store.record_result(worker_id, result);
        Ok(())
    }

    /// Primes submitted so far for a job, in range order
    pub fn get_results(&self, job_id: &JobId) -> Vec<u64> {
        self.store.collect_primes(job_id)
    }

    pub fn job_status(&self, job_id: &JobId) -> CoordinatorResult<JobStatus> {
        let job = self.store.job(job_id).ok_or_else(|| CoordinatorError::UnknownJob {
            job_id: job_id.clone(),
        })?;

        let (mut pending, mut assigned, mut completed) = (0, 0, 0);
        for chunk_id in &job.chunk_ids {
            match self.store.chunk_status(chunk_id) {
                Some(ChunkStatus::Pending) => pending += 1,
                Some(ChunkStatus::Assigned { .. }) => assigned += 1,
                Some(ChunkStatus::Completed { .. }) => completed += 1,
                None => {}
            }
        }

        Ok(JobStatus {
            job_id: job.id.clone(),
            start: job.start,
            end: job.end,
            chunk_size: job.chunk_size,
            rounds: job.rounds,
            total_chunks: job.chunk_ids.len(),
            pending,
            assigned,
            completed,
            complete: completed == job.chunk_ids.len(),
        })
    }

    /// Keep-alive from a worker that is busy computing
    pub fn heartbeat(&mut self, worker_id: &WorkerId) -> CoordinatorResult<()> {
        if self.store.touch_worker(worker_id, Instant::now()) {
            Ok(())
        } else {
            Err(CoordinatorError::UnknownWorker {
                worker_id: worker_id.clone(),
            })
        }
    }

    /// Return assignments of silent workers to the pending queue
    ///
    /// An assignment is stale when its worker's last contact is more than
    /// `worker_timeout` before `now`, or when the worker record is gone.
    pub fn requeue_stale(&mut self, now: Instant) -> usize {
        let timeout = self.config.worker_timeout;
        let stale: Vec<_> = self
            .store
            .assignments()
            .filter(|(_, worker_id, _)| match self.store.worker(worker_id) {
                Some(worker) => now.saturating_duration_since(worker.last_contact) > timeout,
                None => true,
            })
            .map(|(chunk_id, _, assigned_at)| (chunk_id.clone(), assigned_at))
            .collect();

        let Some(oldest) = stale.iter().map(|(_, assigned_at)| *assigned_at).min() else {
            return 0;
        };
        let chunk_ids: Vec<_> = stale.into_iter().map(|(chunk_id, _)| chunk_id).collect();

        let requeued = self.store.requeue(&chunk_ids);
        process_info!(
            ProcessId::current(),
            "♻️ Requeued {} chunk(s) from workers silent for over {:?}, oldest held {:?}",
            requeued,
            timeout,
            now.saturating_duration_since(oldest)
        );
        requeued
    }

    pub fn stats(&self) -> CoordinatorStats {
        self.store.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Algorithm, ChunkId};
    use std::time::Duration;

    fn coordinator() -> Coordinator {
        Coordinator::new(CoordinatorConfig::default(), ChunkStore::new())
    }

    fn result_for(chunk: &WorkChunk, primes: Vec<u64>) -> ChunkResult {
        ChunkResult {
            chunk_id: chunk.id.clone(),
            primes,
            compute_duration: Duration::from_millis(3),
        }
    }

    /// Trial division, good enough for test ranges
    fn primes_between(start: u64, end: u64) -> Vec<u64> {
        (start..=end)
            .filter(|n| *n >= 2 && (2..).take_while(|d| d * d <= *n).all(|d| n % d != 0))
            .collect()
    }

    #[test]
    fn test_create_job_rejects_invalid_ranges() {
        let mut coordinator = coordinator();

        for (start, end, chunk_size) in [(10, 5, 10), (1, 30, 10), (0, 30, 10), (2, 30, 0)] {
            let result = coordinator.create_job(start, end, 0, chunk_size);
            assert!(
                matches!(result, Err(CoordinatorError::InvalidRange { .. })),
                "expected InvalidRange for ({start}, {end}, {chunk_size})"
            );
        }
        assert_eq!(coordinator.stats().jobs, 0);
        assert_eq!(coordinator.stats().pending_chunks, 0);
    }

    #[test]
    fn test_create_job_enforces_chunk_limit() {
        let config = CoordinatorConfig {
            max_chunks_per_job: 4,
            ..Default::default()
        };
        let mut coordinator = Coordinator::new(config, ChunkStore::new());

        assert!(coordinator.create_job(2, 41, 0, 10).is_ok());
        assert!(matches!(
            coordinator.create_job(2, 42, 0, 10),
            Err(CoordinatorError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_full_scenario_small_range() {
        let mut coordinator = coordinator();
        let worker = WorkerId::from("w-1");
        coordinator.register_worker(worker.clone());

        let job_id = coordinator.create_job(2, 30, 0, 10).unwrap();

        let mut handed_out = Vec::new();
        while let Some(chunk) = coordinator.get_next_chunk(&worker).unwrap() {
            assert_eq!(chunk.algorithm, Algorithm::Deterministic);
            let primes = primes_between(chunk.start, chunk.end);
            coordinator.submit_result(&worker, result_for(&chunk, primes)).unwrap();
            handed_out.push((chunk.start, chunk.end));
        }

        assert_eq!(handed_out, vec![(2, 11), (12, 21), (22, 30)]);
        assert_eq!(
            coordinator.get_results(&job_id),
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]
        );
        assert_eq!(coordinator.store().worker(&worker).unwrap().completed_count, 3);

        let status = coordinator.job_status(&job_id).unwrap();
        assert!(status.complete);
        assert_eq!(status.completed, 3);
        assert_eq!((status.chunk_size, status.rounds), (10, 0));
    }

    #[test]
    fn test_empty_queue_is_not_an_error() {
        let mut coordinator = coordinator();
        let worker = WorkerId::from("w-1");
        coordinator.register_worker(worker.clone());

        assert_eq!(coordinator.get_next_chunk(&worker).unwrap(), None);
    }

    #[test]
    fn test_unknown_worker_is_rejected() {
        let mut coordinator = coordinator();
        coordinator.create_job(2, 30, 0, 10).unwrap();
        let ghost = WorkerId::from("ghost-worker");

        assert_eq!(
            coordinator.get_next_chunk(&ghost),
            Err(CoordinatorError::UnknownWorker { worker_id: ghost.clone() })
        );
        assert!(matches!(
            coordinator.heartbeat(&ghost),
            Err(CoordinatorError::UnknownWorker { .. })
        ));
        // The failed pull must not consume a chunk
        assert_eq!(coordinator.stats().pending_chunks, 3);
    }

    #[test]
    fn test_sequential_pulls_never_repeat_a_chunk() {
        let mut coordinator = coordinator();
        let workers: Vec<WorkerId> = (0..3).map(|i| WorkerId::from(format!("w-{i}"))).collect();
        for worker in &workers {
            coordinator.register_worker(worker.clone());
        }
        coordinator.create_job(2, 1_001, 0, 10).unwrap();

        let mut seen = std::collections::HashSet::new();
        for worker in workers.iter().cycle() {
            match coordinator.get_next_chunk(worker).unwrap() {
                Some(chunk) => assert!(seen.insert(chunk.id), "chunk handed out twice"),
                None => break,
            }
        }
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_resubmission_overwrites_previous_result() {
        let mut coordinator = coordinator();
        let worker = WorkerId::from("w-1");
        coordinator.register_worker(worker.clone());
        let job_id = coordinator.create_job(2, 11, 0, 10).unwrap();
        let chunk = coordinator.get_next_chunk(&worker).unwrap().unwrap();

        coordinator.submit_result(&worker, result_for(&chunk, vec![2, 3, 5, 7, 11])).unwrap();
        coordinator.submit_result(&worker, result_for(&chunk, vec![7])).unwrap();

        assert_eq!(coordinator.get_results(&job_id), vec![7]);
        assert_eq!(coordinator.store().worker(&worker).unwrap().completed_count, 1);
    }

    #[test]
    fn test_submission_from_other_worker_is_not_assigned() {
        let mut coordinator = coordinator();
        let owner = WorkerId::from("w-owner");
        let intruder = WorkerId::from("w-intruder");
        coordinator.register_worker(owner.clone());
        coordinator.register_worker(intruder.clone());
        let job_id = coordinator.create_job(2, 30, 0, 10).unwrap();
        let chunk = coordinator.get_next_chunk(&owner).unwrap().unwrap();

        let result = coordinator.submit_result(&intruder, result_for(&chunk, vec![2]));

        assert!(matches!(result, Err(CoordinatorError::NotAssigned { .. })));
        assert!(coordinator.get_results(&job_id).is_empty());
        assert!(coordinator.store().worker(&owner).unwrap().active_chunks.contains(&chunk.id));
    }

    #[test]
    fn test_submission_for_pending_or_unknown_chunk() {
        let mut coordinator = coordinator();
        let worker = WorkerId::from("w-1");
        coordinator.register_worker(worker.clone());
        let job_id = coordinator.create_job(2, 30, 0, 10).unwrap();
        let pending = coordinator.store().job(&job_id).unwrap().chunk_ids[0].clone();

        let result = coordinator.submit_result(
            &worker,
            ChunkResult {
                chunk_id: pending,
                primes: vec![],
                compute_duration: Duration::ZERO,
            },
        );
        assert!(matches!(result, Err(CoordinatorError::NotAssigned { .. })));

        let result = coordinator.submit_result(
            &worker,
            ChunkResult {
                chunk_id: ChunkId::from("job-nope-0"),
                primes: vec![],
                compute_duration: Duration::ZERO,
            },
        );
        assert!(matches!(result, Err(CoordinatorError::UnknownChunk { .. })));
    }

    #[test]
    fn test_partial_results_omit_unfinished_chunks() {
        let mut coordinator = coordinator();
        let worker = WorkerId::from("w-1");
        coordinator.register_worker(worker.clone());
        let job_id = coordinator.create_job(2, 30, 0, 10).unwrap();

        let _first = coordinator.get_next_chunk(&worker).unwrap().unwrap();
        let second = coordinator.get_next_chunk(&worker).unwrap().unwrap();
        coordinator.submit_result(&worker, result_for(&second, vec![13, 17, 19])).unwrap();

        assert_eq!(coordinator.get_results(&job_id), vec![13, 17, 19]);
        let status = coordinator.job_status(&job_id).unwrap();
        assert_eq!((status.pending, status.assigned, status.completed), (1, 1, 1));
        assert!(!status.complete);
    }

    #[test]
    fn test_job_status_unknown_job() {
        let coordinator = coordinator();
        assert!(matches!(
            coordinator.job_status(&JobId::from("job-missing")),
            Err(CoordinatorError::UnknownJob { .. })
        ));
        assert!(coordinator.get_results(&JobId::from("job-missing")).is_empty());
    }

    #[test]
    fn test_stale_assignment_is_handed_out_again() {
        let config = CoordinatorConfig {
            worker_timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let mut coordinator = Coordinator::new(config, ChunkStore::new());
        let silent = WorkerId::from("w-silent");
        let healthy = WorkerId::from("w-healthy");
        coordinator.register_worker(silent.clone());
        coordinator.register_worker(healthy.clone());
        coordinator.create_job(2, 30, 0, 10).unwrap();
        let chunk = coordinator.get_next_chunk(&silent).unwrap().unwrap();

        // Nothing is stale yet
        assert_eq!(coordinator.requeue_stale(Instant::now()), 0);

        let later = Instant::now() + Duration::from_secs(6);
        assert_eq!(coordinator.requeue_stale(later), 1);
        assert!(coordinator.store().worker(&silent).unwrap().active_chunks.is_empty());

        let reassigned = coordinator.get_next_chunk(&healthy).unwrap().unwrap();
        assert_eq!(reassigned.id, chunk.id);

        // The silent worker lost the assignment
        let late = coordinator.submit_result(&silent, result_for(&chunk, vec![2]));
        assert!(matches!(late, Err(CoordinatorError::NotAssigned { .. })));
        coordinator.submit_result(&healthy, result_for(&chunk, vec![2, 3, 5, 7, 11])).unwrap();
    }

    #[test]
    fn test_heartbeat_keeps_assignment_alive() {
        let config = CoordinatorConfig {
            worker_timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let mut coordinator = Coordinator::new(config, ChunkStore::new());
        let worker = WorkerId::from("w-1");
        coordinator.register_worker(worker.clone());
        coordinator.create_job(2, 30, 0, 10).unwrap();
        coordinator.get_next_chunk(&worker).unwrap().unwrap();

        std::thread::sleep(Duration::from_millis(80));
        coordinator.heartbeat(&worker).unwrap();

        assert_eq!(coordinator.requeue_stale(Instant::now()), 0);
        assert_eq!(coordinator.stats().assigned_chunks, 1);
    }

    #[test]
    fn test_reregistration_resets_worker_record() {
        let mut coordinator = coordinator();
        let worker = WorkerId::from("w-1");
        coordinator.register_worker(worker.clone());
        coordinator.create_job(2, 30, 0, 10).unwrap();
        coordinator.get_next_chunk(&worker).unwrap().unwrap();

        coordinator.register_worker(worker.clone());

        let info = coordinator.store().worker(&worker).unwrap();
        assert!(info.active_chunks.is_empty());
        assert_eq!(info.completed_count, 0);
    }
}
