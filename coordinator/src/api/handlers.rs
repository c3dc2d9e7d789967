//! REST API handlers

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::{
    process_debug, ChunkResult, CreateJobRequest, CreateJobResponse, HealthResponse, JobId,
    JobResultsResponse, JobStatus, ProcessId, RegisterWorkerRequest, RegisterWorkerResponse,
    SubmitResultRequest, WorkerId,
};

use super::ApiState;
use crate::error::{CoordinatorError, CoordinatorResult};

fn malformed(rejection: JsonRejection) -> CoordinatorError {
    CoordinatorError::MalformedPayload {
        message: rejection.body_text(),
    }
}

/// Create a job - `POST /jobs`
pub async fn create_job(
    State(state): State<ApiState>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> CoordinatorResult<(StatusCode, Json<CreateJobResponse>)> {
    let Json(request) = payload.map_err(malformed)?;

    let chunk_size = state.config.effective_chunk_size(request.chunk_size);
    let rounds = u32::try_from(request.rounds.max(0)).unwrap_or(u32::MAX);

    let job_id = state
        .coordinator
        .create_job(request.start, request.end, rounds, chunk_size)
        .await?;

    Ok((StatusCode::CREATED, Json(CreateJobResponse { job_id })))
}

/// Job progress - `GET /jobs/{jobId}`
pub async fn job_status(
    State(state): State<ApiState>,
    Path(job_id): Path<String>,
) -> CoordinatorResult<Json<JobStatus>> {
    let status = state.coordinator.job_status(JobId::from(job_id)).await?;
    Ok(Json(status))
}

/// Primes collected so far - `GET /jobs/{jobId}/results`
pub async fn job_results(
    State(state): State<ApiState>,
    Path(job_id): Path<String>,
) -> CoordinatorResult<Json<JobResultsResponse>> {
    let job_id = JobId::from(job_id);
    let primes = state.coordinator.get_results(job_id.clone()).await?;
    Ok(Json(JobResultsResponse { job_id, primes }))
}

/// Register a worker - `POST /workers`
///
/// An empty body gets a freshly generated ID; a body naming an ID re-registers
/// that worker. Requested IDs must be usable as a single path segment.
pub async fn register_worker(
    State(state): State<ApiState>,
    body: Bytes,
) -> CoordinatorResult<(StatusCode, Json<RegisterWorkerResponse>)> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        RegisterWorkerRequest::default()
    } else {
        serde_json::from_slice::<RegisterWorkerRequest>(&body).map_err(|e| {
            CoordinatorError::MalformedPayload {
                message: e.to_string(),
            }
        })?
    };

    let worker_id = match request.worker_id {
        Some(requested) => WorkerId::parse(requested.as_str())?,
        None => WorkerId::generate(),
    };
    state.coordinator.register_worker(worker_id.clone()).await?;

    Ok((StatusCode::CREATED, Json(RegisterWorkerResponse { worker_id })))
}

/// Pull the next chunk - `GET /workers/{workerId}/chunk`
///
/// `204 No Content` when the queue is empty.
pub async fn next_chunk(
    State(state): State<ApiState>,
    Path(worker_id): Path<String>,
) -> CoordinatorResult<Response> {
    let chunk = state.coordinator.get_next_chunk(WorkerId::from(worker_id)).await?;

    Ok(match chunk {
        Some(chunk) => Json(chunk).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Keep-alive while computing - `POST /workers/{workerId}/heartbeat`
pub async fn heartbeat(
    State(state): State<ApiState>,
    Path(worker_id): Path<String>,
) -> CoordinatorResult<StatusCode> {
    state.coordinator.heartbeat(WorkerId::from(worker_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submit a chunk result - `POST /workers/{workerId}/results`
pub async fn submit_result(
    State(state): State<ApiState>,
    Path(worker_id): Path<String>,
    payload: Result<Json<SubmitResultRequest>, JsonRejection>,
) -> CoordinatorResult<StatusCode> {
    let Json(request) = payload.map_err(malformed)?;
    let worker_id = WorkerId::from(worker_id);

    process_debug!(
        ProcessId::current(),
        "Result submission from {} for {}",
        worker_id,
        request.chunk_id
    );
    state
        .coordinator
        .submit_result(worker_id, ChunkResult::from(request))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Health check - `GET /health`
pub async fn health_check(
    State(state): State<ApiState>,
) -> CoordinatorResult<Json<HealthResponse>> {
    let stats = state.coordinator.stats().await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        stats,
    }))
}
