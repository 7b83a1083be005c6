//! Storage collaborator for lead records.
//!
//! The pipeline only knows the [`LeadStore`] trait: insert a row of named
//! columns into a table and get back the assigned identifier. Production
//! uses [`postgres::PgLeadStore`]; tests and local runs can use
//! [`memory::MemoryStore`].

use std::{future::Future, pin::Pin};

use crate::error::StoreError;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgLeadStore;

/// Result type alias using [`StoreError`].
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Column name and value pairs, in column order.
pub type Row = [(String, String)];

/// Persistence operations required by the lead handlers.
pub trait LeadStore: Send + Sync + 'static {
    /// Inserts one row and returns the identifier assigned to it.
    ///
    /// Column names and values are passed as data. Implementations must
    /// bind values as parameters and never splice them into query text.
    fn insert<'a>(&'a self, table: &'a str, row: &'a Row) -> StoreFuture<'a, i64>;

    /// Verifies the backend is reachable.
    fn health_check(&self) -> StoreFuture<'_, ()>;
}

/// True when `name` is a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false };

    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quotes a plain identifier for use in SQL text.
///
/// # Errors
///
/// Returns [`StoreError::InvalidIdentifier`] for anything that is not a
/// plain identifier.
pub fn quote_identifier(name: &str) -> StoreResult<String> {
    if is_plain_identifier(name) {
        Ok(format!("\"{name}\""))
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}
