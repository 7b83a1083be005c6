//! Query-string entry point of the lead endpoint.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Response,
};
use leadline_core::RequestParams;
use tracing::{instrument, warn, Span};

use crate::{response, AppState};

/// Handles `GET /?action=..&method=..&...`.
///
/// Builds the request parameters, runs the pipeline and emits its single
/// envelope, JSONP-wrapped when a callback was supplied.
#[instrument(name = "lead_request", skip_all, fields(action, method, params))]
pub async fn handle_query(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let params = match query {
        Ok(Query(pairs)) => RequestParams::from_pairs(pairs),
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable query string treated as empty");
            RequestParams::default()
        },
    };

    let span = Span::current();
    span.record("params", params.len());
    if let Some(action) = params.action() {
        span.record("action", action);
    }
    if let Some(method) = params.method() {
        span.record("method", method);
    }

    let envelope = state.pipeline.process(&params).await;
    response::emit(&envelope, params.callback())
}
