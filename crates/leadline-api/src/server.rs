//! HTTP server configuration and request routing.
//!
//! Requests flow through middleware in order:
//! 1. Request ID generation
//! 2. Request/response logging
//! 3. Timeout enforcement
//! 4. Handler execution
//!
//! The lead route answers an expired deadline with an envelope like any
//! other outcome; the health routes use a plain `408`.
//!
//! # Graceful Shutdown
//!
//! The server stops accepting connections on SIGINT or SIGTERM and lets
//! in-flight requests finish.

use std::{net::SocketAddr, time::Duration};

use axum::{
    extract::{Query, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use leadline_core::{RequestParams, ResponseCode};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{handlers, response, AppState};

/// Creates the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use leadline_api::{
///     create_router, AppState, Pipeline, PipelineSettings, StoreBinding,
/// };
/// use leadline_core::MemoryStore;
///
/// let pipeline =
///     Pipeline::new(StoreBinding::ready(MemoryStore::new()), PipelineSettings::default());
/// let app = create_router(AppState::new(pipeline), Duration::from_secs(30));
/// ```
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/live", get(handlers::liveness_check))
        .layer(TimeoutLayer::new(request_timeout));

    let lead_routes = Router::new()
        .route("/", get(handlers::handle_query))
        .layer(middleware::from_fn_with_state(request_timeout, enforce_lead_deadline));

    Router::new()
        .merge(health_routes)
        .merge(lead_routes)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .with_state(state)
}

/// Middleware to inject request ID into all responses.
async fn inject_request_id(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let mut req = req;
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    if let Ok(header_value) = request_id.parse() {
        response.headers_mut().insert("X-Request-Id", header_value);
    }

    response
}

/// Bounds a lead request by the request deadline.
///
/// Only the store insert can outlast it, so an expired deadline is
/// reported as an insert failure, wrapped in the caller's callback.
async fn enforce_lead_deadline(
    State(deadline): State<Duration>,
    req: Request,
    next: Next,
) -> Response {
    let callback = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(pairs)| RequestParams::from_pairs(pairs).callback().map(String::from));

    match tokio::time::timeout(deadline, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(
                deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                "Lead request exceeded its deadline"
            );
            response::emit(&ResponseCode::DatabaseInsertError.envelope(), callback.as_deref())
        },
    }
}

/// Starts the HTTP server with graceful shutdown support.
///
/// # Errors
///
/// Returns `std::io::Error` if the address cannot be bound.
pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    request_timeout: Duration,
) -> Result<(), std::io::Error> {
    let app = create_router(state, request_timeout);

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("HTTP server listening on {}", actual_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    warn!("Waiting for in-flight requests to complete");
}
