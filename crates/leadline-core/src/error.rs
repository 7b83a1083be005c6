//! Error types for the lead pipeline and the store collaborator.
//!
//! Every [`LeadError`] is terminal: the first one raised ends the request
//! and is rendered through the response catalog. Store internals are kept
//! in the error for logging and never reach the envelope.

use thiserror::Error;

use crate::{
    catalog::{Envelope, ResponseCode},
    validate::MissingFields,
};

/// Debug note attached when the record projection is empty.
pub const EMPTY_RECORD_NOTE: &str = "No Database data present.";

/// Result type alias using [`LeadError`].
pub type Result<T> = std::result::Result<T, LeadError>;

/// Terminal failures of the request pipeline.
#[derive(Debug, Error)]
pub enum LeadError {
    /// The request carried no parameters.
    #[error("request carried no parameters")]
    NoData,

    /// `action` was not supplied.
    #[error("`action` parameter missing")]
    ActionMissing,

    /// `method` was not supplied.
    #[error("`method` parameter missing")]
    MethodMissing,

    /// `action` is not one of get, post, put, delete.
    #[error("action `{action}` is not allowed")]
    ActionInvalid {
        /// Raw action value.
        action: String,
    },

    /// No handler is registered for the pair.
    #[error("no handler for action `{action}` and method `{method}`")]
    MethodInvalid {
        /// Normalized action.
        action: String,
        /// Raw method value.
        method: String,
    },

    /// No database profile exists for the active environment.
    #[error("no database profile for environment `{environment}`")]
    ConfigMissing {
        /// Active environment name.
        environment: String,
    },

    /// Required lead fields are absent or empty.
    #[error("required fields missing: {}", .0.fields().join(", "))]
    FieldsMissing(MissingFields),

    /// The whitelist projection produced nothing to store.
    #[error("no storable lead fields")]
    RecordEmpty,

    /// The store failed, timed out or was unreachable.
    #[error("lead insert failed: {0}")]
    InsertFailed(#[source] StoreError),
}

impl LeadError {
    /// Catalog entry rendered for this error.
    pub const fn code(&self) -> ResponseCode {
        match self {
            Self::NoData => ResponseCode::DataMissing,
            Self::ActionMissing => ResponseCode::ActionMissing,
            Self::MethodMissing => ResponseCode::MethodMissing,
            Self::ActionInvalid { .. } => ResponseCode::ActionInvalid,
            Self::MethodInvalid { .. } => ResponseCode::MethodInvalid,
            Self::ConfigMissing { .. } => ResponseCode::DatabaseConfigMissing,
            Self::FieldsMissing(_) | Self::RecordEmpty => ResponseCode::LeadDataMissing,
            Self::InsertFailed(_) => ResponseCode::DatabaseInsertError,
        }
    }

    /// Renders the error as its catalog envelope.
    ///
    /// Validation failures carry one debug line per missing field; an empty
    /// record carries a single note.
    pub fn into_envelope(self) -> Envelope {
        let envelope = self.code().envelope();
        match self {
            Self::FieldsMissing(missing) => envelope.with_debug(missing.messages()),
            Self::RecordEmpty => envelope.with_debug(vec![EMPTY_RECORD_NOTE.to_string()]),
            _ => envelope,
        }
    }
}

impl From<MissingFields> for LeadError {
    fn from(missing: MissingFields) -> Self {
        Self::FieldsMissing(missing)
    }
}

impl From<StoreError> for LeadError {
    fn from(err: StoreError) -> Self {
        Self::InsertFailed(err)
    }
}

/// Errors raised by a [`crate::store::LeadStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Table or column name is not a plain identifier.
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),

    /// The operation exceeded its deadline.
    #[error("store operation timed out after {timeout_ms}ms")]
    Timeout {
        /// Deadline that was exceeded in milliseconds.
        timeout_ms: u64,
    },

    /// The store refused the insert.
    #[error("insert rejected: {0}")]
    Rejected(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::ConstraintViolation(format!("unique constraint violation: {db_err}"))
            },
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                Self::ConstraintViolation(format!("check constraint violation: {db_err}"))
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => Self::Unavailable(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}
