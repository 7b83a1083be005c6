//! Lead handlers: validate, build, persist, respond.
//!
//! Each lead kind runs the same fixed sequence over its own whitelists.
//! The required-field check and the record projection are independent: a
//! request passing validation can still yield an empty record, which is
//! reported separately.

use leadline_core::{
    build_record, validate_required, Envelope, LeadError, LeadKind, LeadStore, RequestParams,
    ResponseCode, Result, StoreError,
};
use tracing::{debug, error, info, instrument};

use crate::pipeline::PipelineSettings;

/// Stores a new lead of `kind` and returns the success envelope with the
/// assigned id.
///
/// # Errors
///
/// - [`LeadError::FieldsMissing`] when required fields are absent or empty
/// - [`LeadError::RecordEmpty`] when no whitelisted field qualifies
/// - [`LeadError::InsertFailed`] when the store fails or exceeds the
///   configured deadline
#[instrument(name = "put_lead", skip(params, store, settings), fields(kind = %kind))]
pub async fn put_lead(
    kind: LeadKind,
    params: &RequestParams,
    store: &dyn LeadStore,
    settings: &PipelineSettings,
) -> Result<Envelope> {
    validate_required(kind.required_fields(), params)?;

    let record = build_record(&kind.candidate_fields(), params);
    if record.is_empty() {
        return Err(LeadError::RecordEmpty);
    }
    debug!(fields = record.len(), "Lead record built");

    let row = record.tagged(kind);
    let insert = store.insert(&settings.leads_table, &row);

    let id = match tokio::time::timeout(settings.store_timeout, insert).await {
        Ok(Ok(id)) => id,
        Ok(Err(e)) => {
            error!(error = %e, "Failed to persist lead");
            return Err(e.into());
        },
        Err(_) => {
            let timeout_ms = u64::try_from(settings.store_timeout.as_millis()).unwrap_or(u64::MAX);
            error!(timeout_ms, "Lead insert timed out");
            return Err(StoreError::Timeout { timeout_ms }.into());
        },
    };

    info!(id, "Lead stored");
    Ok(ResponseCode::LeadInsertSuccess.envelope().with_id(id))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use leadline_core::MemoryStore;

    use super::*;

    fn settings() -> PipelineSettings {
        PipelineSettings::default()
    }

    #[tokio::test]
    async fn contact_lead_is_stored_with_kind_tag() {
        let store = MemoryStore::new();
        let params = RequestParams::from_pairs([
            ("domain", "acme.com"),
            ("name", " Bob "),
            ("telephone", "555-1234"),
            ("product", "ignored for contact"),
        ]);

        let envelope = put_lead(LeadKind::Contact, &params, &store, &settings()).await.unwrap();

        assert_eq!(envelope.id, Some(1));
        let rows = store.rows().await;
        assert_eq!(rows[0].table, "leads");
        assert_eq!(rows[0].get("NAME"), Some("Bob"));
        assert_eq!(rows[0].get("PRODUCT"), None);
        assert_eq!(rows[0].get("LEAD_TYPE"), Some("contact"));
    }

    #[tokio::test]
    async fn missing_fields_stop_before_the_store() {
        let store = MemoryStore::new();
        let params = RequestParams::from_pairs([("domain", "acme.com")]);

        let err = put_lead(LeadKind::Product, &params, &store, &settings()).await.unwrap_err();

        assert!(matches!(err, LeadError::FieldsMissing(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn store_failure_maps_to_insert_error() {
        let store = MemoryStore::new();
        store.fail_inserts("connection reset").await;
        let params = RequestParams::from_pairs([
            ("domain", "acme.com"),
            ("name", "Bob"),
            ("telephone", "555"),
        ]);

        let err = put_lead(LeadKind::Contact, &params, &store, &settings()).await.unwrap_err();

        assert_eq!(err.code(), ResponseCode::DatabaseInsertError);
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let store = MemoryStore::new();
        store.set_latency(Duration::from_millis(200)).await;
        let settings = PipelineSettings {
            store_timeout: Duration::from_millis(10),
            ..PipelineSettings::default()
        };
        let params = RequestParams::from_pairs([
            ("domain", "acme.com"),
            ("name", "Bob"),
            ("telephone", "555"),
        ]);

        let err = put_lead(LeadKind::Contact, &params, &store, &settings).await.unwrap_err();

        assert!(matches!(err, LeadError::InsertFailed(StoreError::Timeout { timeout_ms: 10 })));
        assert!(store.is_empty().await);
    }
}
