//! PostgreSQL lead store.

use sqlx::{PgPool, Postgres};
use tracing::debug;

use super::{quote_identifier, LeadStore, Row, StoreFuture, StoreResult};
use crate::error::StoreError;

/// Lead store backed by a PostgreSQL pool.
///
/// The pool is owned here; connection lifecycle and reuse are this type's
/// concern, not the pipeline's.
#[derive(Clone)]
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn insert_impl(&self, table: &str, row: &Row) -> StoreResult<i64> {
        let sql = insert_statement(table, row)?;
        debug!(table, columns = row.len(), "Inserting lead row");

        let query = row
            .iter()
            .fold(sqlx::query_scalar::<Postgres, i64>(&sql), |query, (_, value)| {
                query.bind(value.as_str())
            });

        Ok(query.fetch_one(&self.pool).await?)
    }
}

impl LeadStore for PgLeadStore {
    fn insert<'a>(&'a self, table: &'a str, row: &'a Row) -> StoreFuture<'a, i64> {
        Box::pin(self.insert_impl(table, row))
    }

    fn health_check(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
            Ok(())
        })
    }
}

/// Builds a parameterised insert returning the new `id`.
///
/// Values become `$n` placeholders; only validated identifiers are placed
/// in the statement text.
fn insert_statement(table: &str, row: &Row) -> StoreResult<String> {
    if row.is_empty() {
        return Err(StoreError::Rejected("row has no columns".to_string()));
    }

    let table = quote_identifier(table)?;
    let columns =
        row.iter().map(|(name, _)| quote_identifier(name)).collect::<StoreResult<Vec<_>>>()?;
    let placeholders: Vec<String> = (1..=row.len()).map(|n| format!("${n}")).collect();

    Ok(format!(
        "INSERT INTO {table} ({}) VALUES ({}) RETURNING id",
        columns.join(", "),
        placeholders.join(", ")
    ))
}
