//! Request pipeline from parameter intake to the final envelope.
//!
//! Checks run in a fixed order and the first failure ends the request:
//!
//! 1. any parameters at all
//! 2. `action` present
//! 3. `method` present
//! 4. `action` is one of get, post, put, delete
//! 5. a store is bound for the active environment
//! 6. `(action, method)` is in the dispatch table
//! 7. the selected handler runs
//!
//! Every step returns through `Result`, so reaching an envelope always
//! means the request is finished.

use std::{sync::Arc, time::Duration};

use leadline_core::{
    Action, DispatchTable, Envelope, Handler, LeadError, LeadStore, RequestParams, Result,
};
use tracing::{debug, info, warn};

use crate::handlers::leads;

/// Store reachable by the pipeline for the active environment.
#[derive(Clone)]
pub enum StoreBinding {
    /// A store is configured and ready for inserts.
    Ready(Arc<dyn LeadStore>),
    /// No database profile exists for the active environment.
    Unconfigured {
        /// Active environment name.
        environment: String,
    },
}

impl StoreBinding {
    /// Binds a ready store.
    pub fn ready(store: impl LeadStore) -> Self {
        Self::Ready(Arc::new(store))
    }

    /// Returns the store, or the configuration error when none is bound.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::ConfigMissing`] for an unconfigured binding.
    pub fn store(&self) -> Result<&Arc<dyn LeadStore>> {
        match self {
            Self::Ready(store) => Ok(store),
            Self::Unconfigured { environment } => {
                Err(LeadError::ConfigMissing { environment: environment.clone() })
            },
        }
    }
}

/// Settings the handlers need besides the store.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Table receiving lead rows.
    pub leads_table: String,
    /// Deadline of a single insert.
    pub store_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { leads_table: "leads".to_string(), store_timeout: Duration::from_secs(5) }
    }
}

/// The dispatch and validation engine.
///
/// Built once at startup; shared read-only across requests.
#[derive(Clone)]
pub struct Pipeline {
    routes: DispatchTable,
    store: StoreBinding,
    settings: PipelineSettings,
}

impl Pipeline {
    /// Creates a pipeline over the standard dispatch table.
    pub fn new(store: StoreBinding, settings: PipelineSettings) -> Self {
        Self::with_routes(DispatchTable::standard(), store, settings)
    }

    /// Creates a pipeline with an explicit dispatch table.
    pub fn with_routes(
        routes: DispatchTable,
        store: StoreBinding,
        settings: PipelineSettings,
    ) -> Self {
        Self { routes, store, settings }
    }

    /// Store binding of the active environment.
    pub fn store(&self) -> &StoreBinding {
        &self.store
    }

    /// Handler settings.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Handles one request and returns its single envelope.
    pub async fn process(&self, params: &RequestParams) -> Envelope {
        match self.run(params).await {
            Ok(envelope) => envelope,
            Err(err) => {
                match &err {
                    LeadError::InsertFailed(_) | LeadError::ConfigMissing { .. } => {
                        warn!(code = %err.code(), error = %err, "Request failed");
                    },
                    _ => debug!(code = %err.code(), error = %err, "Request rejected"),
                }
                err.into_envelope()
            },
        }
    }

    async fn run(&self, params: &RequestParams) -> Result<Envelope> {
        let handler = self.resolve(params)?;

        match handler {
            Handler::PutLead(kind) => {
                info!(kind = %kind, "Dispatching lead handler");
                let store = self.store.store()?;
                leads::put_lead(kind, params, store.as_ref(), &self.settings).await
            },
        }
    }

    /// Runs the precondition checks and selects the handler.
    fn resolve(&self, params: &RequestParams) -> Result<Handler> {
        if params.is_empty() {
            return Err(LeadError::NoData);
        }

        let raw_action = params.action().ok_or(LeadError::ActionMissing)?;
        let method = params.method().ok_or(LeadError::MethodMissing)?;

        let action = Action::parse(raw_action)
            .ok_or_else(|| LeadError::ActionInvalid { action: raw_action.to_string() })?;

        self.store.store()?;

        self.routes.route(action, method).ok_or_else(|| LeadError::MethodInvalid {
            action: action.to_string(),
            method: method.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use leadline_core::{MemoryStore, ResponseCode};

    use super::*;

    fn pipeline() -> Pipeline {
        Pipeline::new(StoreBinding::ready(MemoryStore::new()), PipelineSettings::default())
    }

    fn code_of(pipeline: &Pipeline, pairs: &[(&str, &str)]) -> Option<ResponseCode> {
        let params = RequestParams::from_pairs(pairs.iter().copied());
        pipeline.resolve(&params).err().map(|err| err.code())
    }

    #[test]
    fn precondition_order_is_fixed() {
        let pipeline = pipeline();

        assert_eq!(code_of(&pipeline, &[]), Some(ResponseCode::DataMissing));
        assert_eq!(code_of(&pipeline, &[("method", "x")]), Some(ResponseCode::ActionMissing));
        assert_eq!(code_of(&pipeline, &[("action", "nope")]), Some(ResponseCode::MethodMissing));
        assert_eq!(
            code_of(&pipeline, &[("action", "nope"), ("method", "x")]),
            Some(ResponseCode::ActionInvalid)
        );
        assert_eq!(
            code_of(&pipeline, &[("action", "get"), ("method", "product_lead")]),
            Some(ResponseCode::MethodInvalid)
        );
        assert_eq!(
            code_of(&pipeline, &[("action", "PUT"), ("method", "contact_lead")]),
            Some(ResponseCode::ActionInvalid)
        );
        assert_eq!(code_of(&pipeline, &[("action", "put"), ("method", "contact_lead")]), None);
    }

    #[test]
    fn unconfigured_store_is_reported_before_routing() {
        let pipeline = Pipeline::new(
            StoreBinding::Unconfigured { environment: "STAGING".to_string() },
            PipelineSettings::default(),
        );

        assert_eq!(
            code_of(&pipeline, &[("action", "put"), ("method", "no_such_method")]),
            Some(ResponseCode::DatabaseConfigMissing)
        );
        assert_eq!(code_of(&pipeline, &[("method", "x")]), Some(ResponseCode::ActionMissing));
    }

    #[test]
    fn empty_action_is_invalid_not_missing() {
        assert_eq!(
            code_of(&pipeline(), &[("action", ""), ("method", "product_lead")]),
            Some(ResponseCode::ActionInvalid)
        );
    }
}
