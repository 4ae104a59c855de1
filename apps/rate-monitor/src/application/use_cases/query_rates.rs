//! Query Rates Use Case
//!
//! Read side shared by the REST and chat boundaries.

use std::sync::Arc;

use crate::domain::rate_aggregation::{Snapshot, SnapshotRepository, StoreError};
use crate::domain::shared::Symbol;

/// Use case for reading stored rates.
pub struct QueryRatesUseCase<R>
where
    R: SnapshotRepository,
{
    store: Arc<R>,
}

impl<R> QueryRatesUseCase<R>
where
    R: SnapshotRepository,
{
    /// Create a new `QueryRatesUseCase`.
    pub const fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    /// Every stored snapshot, sorted by symbol.
    ///
    /// # Errors
    ///
    /// Returns error if the store fails.
    pub async fn all(&self) -> Result<Vec<Snapshot>, StoreError> {
        let mut snapshots = self.store.read_all().await?;
        snapshots.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(snapshots)
    }

    /// Snapshot for one symbol.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown symbol.
    pub async fn one(&self, symbol: &Symbol) -> Result<Snapshot, StoreError> {
        self.store.read(symbol).await
    }

    /// Hourly change for one symbol.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown symbol.
    pub async fn change_per_hour(&self, symbol: &Symbol) -> Result<f64, StoreError> {
        self.store.read_change_per_hour(symbol).await
    }
}

impl<R: SnapshotRepository> Clone for QueryRatesUseCase<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
