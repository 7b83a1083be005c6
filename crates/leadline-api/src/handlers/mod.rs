//! HTTP request handlers for the lead endpoint.
//!
//! - `query` - query-string entry point, runs the pipeline
//! - `leads` - per-kind lead handlers selected by the dispatch table
//! - `health` - health and liveness probes
//!
//! Lead handlers return `Result<Envelope, LeadError>`; the entry point
//! turns either side into exactly one emitted envelope.

pub mod health;
pub mod leads;
pub mod query;

pub use health::{health_check, liveness_check};
pub use query::handle_query;
