#![no_main]

//! Fuzz target for query intake and envelope rendering.
//!
//! Feeds arbitrary query strings through parameter intake, validation,
//! record building and rendering. Whatever the input, the emitted body
//! must be a well-formed envelope, optionally inside a valid callback.

use leadline_core::{
    build_record, render, render::is_valid_callback, validate_required, Action, Envelope,
    LeadError, LeadKind, RequestParams, ResponseCode,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    fuzz_query_rendering(data);
});

fn fuzz_query_rendering(data: &[u8]) {
    let query = String::from_utf8_lossy(data);
    let params = RequestParams::from_pairs(query.split('&').filter(|p| !p.is_empty()).map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (decode_component(key), decode_component(value))
    }));

    let _ = params.action().map(Action::parse);

    for kind in LeadKind::ALL {
        let envelope = match validate_required(kind.required_fields(), &params) {
            Err(missing) => LeadError::from(missing).into_envelope(),
            Ok(()) => {
                let record = build_record(&kind.candidate_fields(), &params);
                if record.is_empty() {
                    LeadError::RecordEmpty.into_envelope()
                } else {
                    let row = record.tagged(kind);
                    assert!(row.iter().all(|(name, value)| {
                        name.chars().all(|c| c.is_ascii_uppercase() || c == '_')
                            && value.trim() == value
                    }));
                    ResponseCode::LeadInsertSuccess.envelope().with_id(row.len() as i64)
                }
            },
        };

        check_rendered(&envelope, params.callback());
    }
}

/// Form-decodes one query component the way the HTTP layer does:
/// `+` is a space, percent escapes are decoded, bad UTF-8 is replaced.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

fn check_rendered(envelope: &Envelope, callback: Option<&str>) {
    let rendered = render(envelope, callback);

    let json = match callback {
        Some(name) if is_valid_callback(name) => rendered
            .body
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
            .expect("JSONP body must wrap the envelope"),
        _ => rendered.body.as_str(),
    };

    let parsed: Envelope = serde_json::from_str(json).expect("body must be JSON");
    assert!(parsed.is_well_formed());
}
