//! Lead intake domain.
//!
//! Transport-free building blocks of the lead endpoint: the response
//! catalog and envelope, request parameter intake, required-field
//! validation, whitelist record building, the fixed dispatch table, the
//! envelope renderer and the storage collaborator.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod params;
pub mod record;
pub mod render;
pub mod routing;
pub mod store;
pub mod validate;

pub use catalog::{Envelope, ResponseCode, Status};
pub use error::{LeadError, Result, StoreError};
pub use params::{Action, RequestParams};
pub use record::{build_record, LeadKind, LeadRecord};
pub use render::{render, Rendered};
pub use routing::{DispatchTable, Handler};
pub use store::{LeadStore, MemoryStore, PgLeadStore};
pub use validate::{validate_required, MissingFields};
