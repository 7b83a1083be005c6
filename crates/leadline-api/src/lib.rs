//! Lead endpoint HTTP API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

pub mod config;
pub mod handlers;
pub mod pipeline;
pub mod response;
pub mod server;

pub use config::{Config, DatabaseProfile};
pub use pipeline::{Pipeline, PipelineSettings, StoreBinding};
pub use server::{create_router, start_server};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The request pipeline, built once at startup.
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Wraps a pipeline for sharing across requests.
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}
