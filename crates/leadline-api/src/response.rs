//! HTTP adapter for rendered envelopes.

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use leadline_core::{render, Envelope};

/// Emits `envelope` as the final HTTP response.
///
/// The status is always 200: JSONP consumers cannot read status codes, so
/// the envelope carries the outcome.
pub fn emit(envelope: &Envelope, callback: Option<&str>) -> Response {
    let rendered = render(envelope, callback);
    (StatusCode::OK, [(CONTENT_TYPE, rendered.content_type)], rendered.body).into_response()
}
