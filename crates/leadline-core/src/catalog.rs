//! Response catalog and the uniform response envelope.
//!
//! Every request ends with exactly one [`Envelope`]. Envelopes start life
//! as a catalog template looked up by [`ResponseCode`] and may then be
//! extended with a `debug` list (errors) or an `id` (successful inserts).
//! The catalog is a fixed table compiled into the binary and is never
//! mutated at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome literal carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The request was handled and the lead stored.
    Success,
    /// The request was rejected or could not be completed.
    Error,
}

/// Uniform response body returned for every request.
///
/// Serializes as `{"status":..,"msg":..}` with `debug` and `id` only
/// present when set, in that field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Outcome literal.
    pub status: Status,
    /// Human-readable message.
    pub msg: String,
    /// Diagnostics explaining an error, one entry per problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<String>>,
    /// Identifier assigned by the store on a successful insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Envelope {
    /// Attaches a diagnostic list.
    #[must_use]
    pub fn with_debug(mut self, debug: Vec<String>) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Attaches the identifier returned by the store.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns true when the envelope can be emitted as-is.
    ///
    /// A well-formed envelope has a non-blank message, never carries an
    /// `id` on error and never carries `debug` on success.
    pub fn is_well_formed(&self) -> bool {
        if self.msg.trim().is_empty() {
            return false;
        }

        match self.status {
            Status::Success => self.debug.is_none(),
            Status::Error => self.id.is_none(),
        }
    }

    /// Returns true for success envelopes.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Symbolic codes of the response catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// No parameters at all.
    DataMissing,
    /// `action` parameter absent.
    ActionMissing,
    /// `action` outside the allowed set.
    ActionInvalid,
    /// `method` parameter absent.
    MethodMissing,
    /// No handler for the `(action, method)` pair.
    MethodInvalid,
    /// A malformed envelope reached the formatter.
    ResponseInvalid,
    /// No database profile for the active environment.
    DatabaseConfigMissing,
    /// The store rejected or failed the insert.
    DatabaseInsertError,
    /// Required lead fields missing, or nothing to store.
    LeadDataMissing,
    /// Lead stored.
    LeadInsertSuccess,
}

impl ResponseCode {
    /// Every catalog entry, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::DataMissing,
        Self::ActionMissing,
        Self::ActionInvalid,
        Self::MethodMissing,
        Self::MethodInvalid,
        Self::ResponseInvalid,
        Self::DatabaseConfigMissing,
        Self::DatabaseInsertError,
        Self::LeadDataMissing,
        Self::LeadInsertSuccess,
    ];

    /// Returns the symbolic code, e.g. `"action/invalid"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DataMissing => "data/missing",
            Self::ActionMissing => "action/missing",
            Self::ActionInvalid => "action/invalid",
            Self::MethodMissing => "method/missing",
            Self::MethodInvalid => "method/invalid",
            Self::ResponseInvalid => "response/invalid",
            Self::DatabaseConfigMissing => "database/config/missing",
            Self::DatabaseInsertError => "database/insert/error",
            Self::LeadDataMissing => "lead/data/missing",
            Self::LeadInsertSuccess => "lead/insert/success",
        }
    }

    /// Parses a symbolic code back into its catalog entry.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == code)
    }

    /// Returns the status literal of the template.
    pub const fn status(self) -> Status {
        match self {
            Self::LeadInsertSuccess => Status::Success,
            _ => Status::Error,
        }
    }

    /// Returns the message of the template.
    pub const fn message(self) -> &'static str {
        match self {
            Self::DataMissing => "Missing ALL data.",
            Self::ActionMissing => "Missing `action` data.",
            Self::ActionInvalid => "Action requested isn't allowed.",
            Self::MethodMissing => "Missing `method` data.",
            Self::MethodInvalid => "Method requested doesn't exist.",
            Self::ResponseInvalid => "Invalid data passed to response method.",
            Self::DatabaseConfigMissing => "Database configuration file is missing.",
            Self::DatabaseInsertError => "Problem occured on insertion into database.",
            Self::LeadDataMissing => "Missing required data.",
            Self::LeadInsertSuccess => {
                "One of our consultants will contact you as soon as possible. Thank you!"
            },
        }
    }

    /// Builds a fresh envelope from the catalog template.
    pub fn envelope(self) -> Envelope {
        Envelope { status: self.status(), msg: self.message().to_string(), debug: None, id: None }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up a catalog template by its symbolic code.
pub fn lookup(code: &str) -> Option<Envelope> {
    ResponseCode::from_code(code).map(ResponseCode::envelope)
}
