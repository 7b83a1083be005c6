//! Test infrastructure for the lead endpoint.
//!
//! Provides [`TestApp`], a fully wired router over an in-memory store that
//! is driven request-by-request with `tower::ServiceExt::oneshot`, plus
//! query fixtures for each lead kind.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use leadline_api::{create_router, AppState, Pipeline, PipelineSettings, StoreBinding};
pub use leadline_core::store::memory::{MemoryStore, StoredRow};
use serde_json::Value;
use tower::ServiceExt;

pub mod fixtures;

pub use fixtures::QueryBuilder;

/// Router plus the store behind it.
pub struct TestApp {
    /// In-memory store receiving inserts.
    pub store: MemoryStore,
    router: Router,
}

impl TestApp {
    /// App bound to a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_settings(PipelineSettings::default())
    }

    /// App bound to a fresh in-memory store with custom settings.
    pub fn with_settings(settings: PipelineSettings) -> Self {
        Self::with_deadlines(settings, DEFAULT_REQUEST_TIMEOUT)
    }

    /// App with custom settings and a custom request deadline.
    pub fn with_deadlines(settings: PipelineSettings, request_timeout: Duration) -> Self {
        let store = MemoryStore::new();
        let binding = StoreBinding::ready(store.clone());
        Self { store, router: build_router(binding, settings, request_timeout) }
    }

    /// App whose active environment has no database profile.
    pub fn unconfigured(environment: &str) -> Self {
        let binding = StoreBinding::Unconfigured { environment: environment.to_string() };
        let router = build_router(binding, PipelineSettings::default(), DEFAULT_REQUEST_TIMEOUT);
        Self { store: MemoryStore::new(), router }
    }

    /// Sends `GET {path_and_query}` through the router.
    pub async fn get(&self, path_and_query: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("GET")
            .uri(path_and_query)
            .body(Body::empty())
            .context("build request")?;

        let response = self.router.clone().oneshot(request).await.context("execute request")?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.context("read body")?;
        let body = String::from_utf8(bytes.to_vec()).context("body is not utf-8")?;

        Ok(TestResponse { status, content_type, request_id, body })
    }

    /// Sends a lead query built with [`QueryBuilder`].
    pub async fn send(&self, query: &QueryBuilder) -> Result<TestResponse> {
        self.get(&query.path()).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn build_router(
    binding: StoreBinding,
    settings: PipelineSettings,
    request_timeout: Duration,
) -> Router {
    create_router(AppState::new(Pipeline::new(binding, settings)), request_timeout)
}

/// Captured HTTP response.
#[derive(Debug, Clone)]
pub struct TestResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// `Content-Type` header value.
    pub content_type: String,
    /// `X-Request-Id` header value.
    pub request_id: Option<String>,
    /// Raw body text.
    pub body: String,
}

impl TestResponse {
    /// Parses a plain JSON body.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).context("body is not JSON")
    }

    /// Parses the JSON inside a `callback(...)` JSONP body.
    pub fn jsonp(&self, callback: &str) -> Result<Value> {
        let inner = self
            .body
            .strip_prefix(callback)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
            .with_context(|| format!("body is not wrapped in {callback}(...)"))?;

        serde_json::from_str(inner).context("JSONP payload is not JSON")
    }
}
