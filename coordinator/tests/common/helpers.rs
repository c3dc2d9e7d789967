//! Test helpers for driving the HTTP API in-process

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use coordinator::{
    api::{build_router, ApiState},
    ChunkStore, Coordinator, CoordinatorConfig, CoordinatorHandle, CoordinatorService,
};
use serde_json::Value;
use tower::ServiceExt;

/// Router plus the handle behind it
pub struct TestApp {
    pub router: Router,
    pub handle: CoordinatorHandle,
}

pub struct TestHelpers;

impl TestHelpers {
    /// Spawn a coordinator task and build a router over it
    pub fn app(config: CoordinatorConfig) -> TestApp {
        let coordinator = Coordinator::new(config.clone(), ChunkStore::new());
        let (handle, _task) = CoordinatorService::spawn(coordinator);
        let router = build_router(ApiState::new(handle.clone(), config));
        TestApp { router, handle }
    }

    /// Router over a handle whose coordinator task never runs
    pub fn app_without_coordinator(config: CoordinatorConfig) -> TestApp {
        let coordinator = Coordinator::new(config.clone(), ChunkStore::new());
        let (service, handle) = CoordinatorService::new(coordinator);
        drop(service);
        let router = build_router(ApiState::new(handle.clone(), config));
        TestApp { router, handle }
    }

    /// Send one request and return status plus decoded JSON body (Null when empty)
    pub async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn register(router: &Router) -> String {
        let (status, body) = Self::send(router, Method::POST, "/workers", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["workerId"].as_str().unwrap().to_string()
    }

    pub async fn create_job(
        router: &Router,
        start: u64,
        end: u64,
        rounds: i64,
        chunk_size: i64,
    ) -> String {
        let body = super::TestFixtures::create_job_body(start, end, rounds, chunk_size);
        let (status, body) = Self::send(router, Method::POST, "/jobs", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body {body}");
        body["jobId"].as_str().unwrap().to_string()
    }

    /// Pull one chunk; `None` on 204
    pub async fn pull(router: &Router, worker_id: &str) -> Option<Value> {
        let uri = format!("/workers/{worker_id}/chunk");
        let (status, body) = Self::send(router, Method::GET, &uri, None).await;
        match status {
            StatusCode::OK => Some(body),
            StatusCode::NO_CONTENT => None,
            other => panic!("unexpected status {other} with body {body}"),
        }
    }

    pub async fn submit(
        router: &Router,
        worker_id: &str,
        chunk_id: &str,
        primes: &[u64],
    ) -> (StatusCode, Value) {
        let uri = format!("/workers/{worker_id}/results");
        let body = serde_json::json!({
            "chunkId": chunk_id,
            "primes": primes,
            "computeDurationMs": 1,
        });
        Self::send(router, Method::POST, &uri, Some(body)).await
    }

    pub async fn results(router: &Router, job_id: &str) -> Vec<u64> {
        let uri = format!("/jobs/{job_id}/results");
        let (status, body) = Self::send(router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_value(body["primes"].clone()).unwrap()
    }
}
