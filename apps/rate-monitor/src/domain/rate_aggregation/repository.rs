//! Snapshot Repository Trait
//!
//! Persistence abstraction for rate snapshots.
//! Implemented by adapters in the infrastructure layer.

use async_trait::async_trait;

use super::errors::StoreError;
use super::snapshot::Snapshot;
use crate::domain::shared::Symbol;

/// Keyed store of the latest snapshot per symbol.
///
/// Implementations own the persisted state exclusively. Every failure is
/// reported; writes are never dropped silently.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Read every stored snapshot. Order is not significant.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persist` if the query fails.
    async fn read_all(&self) -> Result<Vec<Snapshot>, StoreError>;

    /// Read the snapshot for one symbol.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no snapshot exists, or
    /// `StoreError::Persist` if the query fails.
    async fn read(&self, symbol: &Symbol) -> Result<Snapshot, StoreError>;

    /// Insert or update each snapshot keyed by its name.
    ///
    /// Idempotent. A batch is applied all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persist` naming the first symbol that failed.
    async fn upsert_many(&self, snapshots: &[Snapshot]) -> Result<(), StoreError>;

    /// Read only the hourly change for one symbol.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no snapshot exists, or
    /// `StoreError::Persist` if the query fails.
    async fn read_change_per_hour(&self, symbol: &Symbol) -> Result<f64, StoreError>;
}
