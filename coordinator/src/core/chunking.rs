//! Job decomposition
//!
//! Splits an inclusive range into `chunk_size` strides. The produced chunks are
//! contiguous, ordered, non-overlapping and cover the range exactly; only the
//! last one may be shorter.

use shared::{Algorithm, ChunkId, JobId, WorkChunk};

/// Number of chunks `plan_chunks` would produce
pub fn chunk_count(start: u64, end: u64, chunk_size: u64) -> u64 {
    debug_assert!(start <= end && chunk_size > 0);
    let span = end - start;
    span / chunk_size + 1
}

/// Build the chunks of a job in range order
///
/// `start <= end` and `chunk_size > 0` must already be validated.
pub fn plan_chunks(
    job_id: &JobId,
    start: u64,
    end: u64,
    chunk_size: u64,
    rounds: u32,
    threshold: u64,
) -> Vec<WorkChunk> {
    let capacity = usize::try_from(chunk_count(start, end, chunk_size)).unwrap_or(0);
    let mut chunks = Vec::with_capacity(capacity);
    let mut lower = start;

    loop {
        let upper = lower.saturating_add(chunk_size - 1).min(end);
        chunks.push(WorkChunk {
            id: ChunkId::for_job(job_id, chunks.len()),
            job_id: job_id.clone(),
            start: lower,
            end: upper,
            algorithm: Algorithm::select(lower, upper, threshold, rounds),
        });

        if upper == end {
            break;
        }
        lower = upper + 1;
    }

    chunks
}
