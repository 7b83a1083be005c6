//! Serializes envelopes to JSON or JSONP text.
//!
//! Rendering never produces malformed output: an envelope that fails its
//! shape check is replaced by the `response/invalid` template, and a
//! serialization failure falls back to a fixed body.

use tracing::warn;

use crate::catalog::{Envelope, ResponseCode};

/// Content type of plain JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
/// Content type of JSONP bodies.
pub const JSONP_CONTENT_TYPE: &str = "application/javascript; charset=utf-8";

const FALLBACK_BODY: &str =
    r#"{"status":"error","msg":"Invalid data passed to response method."}"#;

/// Final response text for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Response body.
    pub body: String,
    /// Matching content type.
    pub content_type: &'static str,
}

/// Renders `envelope`, wrapped as `callback(...)` when a usable callback
/// name was supplied.
///
/// Callback names must look like a JavaScript identifier path
/// (`[A-Za-z_$][A-Za-z0-9_$.]*`). Any other name is ignored and the body
/// is emitted as plain JSON.
pub fn render(envelope: &Envelope, callback: Option<&str>) -> Rendered {
    let json = to_json(envelope);

    match callback.filter(|name| !name.is_empty()) {
        Some(name) if is_valid_callback(name) => {
            Rendered { body: format!("{name}({json})"), content_type: JSONP_CONTENT_TYPE }
        },
        Some(name) => {
            warn!(callback = %name, "Ignoring unusable JSONP callback name");
            Rendered { body: json, content_type: JSON_CONTENT_TYPE }
        },
        None => Rendered { body: json, content_type: JSON_CONTENT_TYPE },
    }
}

/// True when `name` can be emitted as a JSONP wrapper.
pub fn is_valid_callback(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false };

    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}

fn to_json(envelope: &Envelope) -> String {
    if !envelope.is_well_formed() {
        warn!(?envelope, "Malformed envelope replaced before emission");
        return serialize(&ResponseCode::ResponseInvalid.envelope());
    }

    serialize(envelope)
}

fn serialize(envelope: &Envelope) -> String {
    serde_json::to_string(envelope).unwrap_or_else(|e| {
        warn!(error = %e, "Envelope serialization failed");
        FALLBACK_BODY.to_string()
    })
}
