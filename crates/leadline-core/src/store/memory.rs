//! In-memory lead store.
//!
//! Keeps inserted rows in process memory with sequential identifiers.
//! Supports injecting insert failures and latency so the pipeline's error
//! and timeout paths can be exercised without a database.

use std::{
    sync::Arc,
    time::Duration,
};

use tokio::sync::RwLock;

use super::{is_plain_identifier, LeadStore, Row, StoreFuture};
use crate::error::StoreError;

/// A row captured by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    /// Identifier assigned on insert.
    pub id: i64,
    /// Target table.
    pub table: String,
    /// Columns in insert order.
    pub columns: Vec<(String, String)>,
}

impl StoredRow {
    /// Value of a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.iter().find(|(name, _)| name == column).map(|(_, value)| value.as_str())
    }
}

/// In-memory [`LeadStore`] with configurable failure behaviour.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<Vec<StoredRow>>>,
    insert_error: Arc<RwLock<Option<String>>>,
    latency: Arc<RwLock<Option<Duration>>>,
    unhealthy: Arc<RwLock<bool>>,
}

impl MemoryStore {
    /// Creates an empty store whose first id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following insert fail with `reason`.
    pub async fn fail_inserts(&self, reason: impl Into<String>) {
        *self.insert_error.write().await = Some(reason.into());
    }

    /// Delays every following operation by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = Some(latency);
    }

    /// Makes health checks fail.
    pub async fn set_unhealthy(&self, unhealthy: bool) {
        *self.unhealthy.write().await = unhealthy;
    }

    /// Snapshot of every stored row.
    pub async fn rows(&self) -> Vec<StoredRow> {
        self.rows.read().await.clone()
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// True when nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    async fn pause(&self) {
        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl LeadStore for MemoryStore {
    fn insert<'a>(&'a self, table: &'a str, row: &'a Row) -> StoreFuture<'a, i64> {
        Box::pin(async move {
            self.pause().await;

            if let Some(reason) = self.insert_error.read().await.clone() {
                return Err(StoreError::Rejected(reason));
            }
            if !is_plain_identifier(table) {
                return Err(StoreError::InvalidIdentifier(table.to_string()));
            }
            if let Some((name, _)) = row.iter().find(|(name, _)| !is_plain_identifier(name)) {
                return Err(StoreError::InvalidIdentifier(name.clone()));
            }

            let mut rows = self.rows.write().await;
            let id = rows.last().map_or(1, |last| last.id + 1);
            rows.push(StoredRow {
                id,
                table: table.to_string(),
                columns: row.to_vec(),
            });

            Ok(id)
        })
    }

    fn health_check(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.pause().await;

            if *self.unhealthy.read().await {
                return Err(StoreError::Unavailable("memory store marked unhealthy".to_string()));
            }
            Ok(())
        })
    }
}
