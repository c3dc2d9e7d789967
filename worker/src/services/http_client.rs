//! HTTP implementation of [`CoordinatorClient`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use shared::{
    process_debug, ChunkResult, ErrorResponse, ProcessId, RegisterWorkerRequest,
    RegisterWorkerResponse, SubmitResultRequest, WorkChunk, WorkerId,
};
use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::traits::CoordinatorClient;

/// Talks JSON over HTTP to the coordinator
pub struct HttpCoordinatorClient {
    client: Client,
    base_url: String,
}

impl HttpCoordinatorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> WorkerResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &WorkerConfig) -> WorkerResult<Self> {
        Self::new(config.server_url.clone(), config.request_timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn worker_url(&self, worker_id: &WorkerId, action: &str) -> String {
        self.url(&format!("/workers/{worker_id}/{action}"))
    }
}

/// Read a JSON body, separating decode failures from transport ones
async fn decode<T: DeserializeOwned>(response: Response) -> WorkerResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| WorkerError::MalformedPayload {
        message: e.to_string(),
    })
}

/// Turn a non-success response into an error
///
/// A 404 on a worker-scoped path means the coordinator does not know the worker.
async fn rejection(response: Response, worker_id: Option<&WorkerId>) -> WorkerError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        if let Some(worker_id) = worker_id {
            return WorkerError::UnknownWorker {
                worker_id: worker_id.to_string(),
            };
        }
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    WorkerError::Rejected {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl CoordinatorClient for HttpCoordinatorClient {
    async fn register(&self, worker_id: Option<WorkerId>) -> WorkerResult<WorkerId> {
        let response = self
            .client
            .post(self.url("/workers"))
            .json(&RegisterWorkerRequest { worker_id })
            .send()
            .await
            .map_err(|e| WorkerError::RegistrationFailed { message: e.to_string() })?;

        if !response.status().is_success() {
            let status = response.status();
            let reason = rejection(response, None).await;
            return Err(WorkerError::RegistrationFailed {
                message: format!("coordinator answered {status}: {reason}"),
            });
        }

        let body: RegisterWorkerResponse = decode(response).await?;
        Ok(body.worker_id)
    }

    async fn next_chunk(&self, worker_id: &WorkerId) -> WorkerResult<Option<WorkChunk>> {
        let response = self.client.get(self.worker_url(worker_id, "chunk")).send().await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => decode(response).await.map(Some),
            _ => Err(rejection(response, Some(worker_id)).await),
        }
    }

    async fn heartbeat(&self, worker_id: &WorkerId) -> WorkerResult<()> {
        let response = self.client.post(self.worker_url(worker_id, "heartbeat")).send().await?;
        if !response.status().is_success() {
            return Err(rejection(response, Some(worker_id)).await);
        }
        process_debug!(ProcessId::current(), "💓 Heartbeat sent for {}", worker_id);
        Ok(())
    }

    async fn submit_result(&self, worker_id: &WorkerId, result: ChunkResult) -> WorkerResult<()> {
        let response = self
            .client
            .post(self.worker_url(worker_id, "results"))
            .json(&SubmitResultRequest::from(result))
            .send()
            .await?;

        if !response.status().is_success() {
            // 404 here may name the chunk rather than the worker
            return Err(rejection(response, None).await);
        }
        Ok(())
    }
}
