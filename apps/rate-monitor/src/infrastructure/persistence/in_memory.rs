//! In-memory snapshot repository for testing.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::rate_aggregation::{Snapshot, SnapshotRepository, StoreError, StoreOperation};
use crate::domain::shared::Symbol;

/// In-memory implementation of `SnapshotRepository`.
///
/// Same semantics as the PostgreSQL adapter, including all-or-nothing
/// batches. Failures can be injected for tests. Not for production use.
#[derive(Debug, Default)]
pub struct InMemorySnapshotRepository {
    snapshots: RwLock<HashMap<Symbol, Snapshot>>,
    failing_upserts: RwLock<HashSet<Symbol>>,
    failing_reads: RwLock<bool>,
}

impl InMemorySnapshotRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }

    /// Store a snapshot directly (for test setup).
    pub fn insert(&self, snapshot: Snapshot) {
        self.snapshots
            .write()
            .insert(snapshot.name().clone(), snapshot);
    }

    /// Make every batch containing `symbol` fail.
    pub fn fail_upserts_for(&self, symbol: Symbol) {
        self.failing_upserts.write().insert(symbol);
    }

    /// Make every read operation fail, or recover.
    pub fn fail_reads(&self, failing: bool) {
        *self.failing_reads.write() = failing;
    }

    fn check_reads(
        &self,
        operation: StoreOperation,
        symbol: Option<&Symbol>,
    ) -> Result<(), StoreError> {
        if *self.failing_reads.read() {
            return Err(StoreError::persist(operation, symbol, "injected read failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn read_all(&self) -> Result<Vec<Snapshot>, StoreError> {
        self.check_reads(StoreOperation::ReadAll, None)?;
        Ok(self.snapshots.read().values().cloned().collect())
    }

    async fn read(&self, symbol: &Symbol) -> Result<Snapshot, StoreError> {
        self.check_reads(StoreOperation::Read, Some(symbol))?;
        self.snapshots
            .read()
            .get(symbol)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                symbol: symbol.clone(),
            })
    }

    async fn upsert_many(&self, snapshots: &[Snapshot]) -> Result<(), StoreError> {
        {
            let failing = self.failing_upserts.read();
            if let Some(bad) = snapshots.iter().find(|s| failing.contains(s.name())) {
                return Err(StoreError::persist(
                    StoreOperation::UpsertMany,
                    Some(bad.name()),
                    "injected write failure",
                ));
            }
        }

        let mut stored = self.snapshots.write();
        for snapshot in snapshots {
            stored.insert(snapshot.name().clone(), snapshot.clone());
        }
        Ok(())
    }

    async fn read_change_per_hour(&self, symbol: &Symbol) -> Result<f64, StoreError> {
        self.read(symbol)
            .await
            .map(|snapshot| snapshot.change_per_hour())
            .map_err(|e| match e {
                StoreError::Persist {
                    symbol, message, ..
                } => StoreError::Persist {
                    operation: StoreOperation::ReadChangePerHour,
                    symbol,
                    message,
                },
                not_found @ StoreError::NotFound { .. } => not_found,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rate_aggregation::RateAggregator;
    use crate::domain::shared::Timestamp;

    fn snapshot(name: &str, price: f64) -> Snapshot {
        RateAggregator::merge(&Symbol::new(name), None, price, Timestamp::now())
    }

    #[tokio::test]
    async fn read_unknown_is_not_found() {
        let repo = InMemorySnapshotRepository::new();
        let err = repo.read(&Symbol::new("BTC")).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                symbol: Symbol::new("BTC")
            }
        );
    }

    #[tokio::test]
    async fn upsert_twice_is_idempotent() {
        let repo = InMemorySnapshotRepository::new();
        let btc = snapshot("BTC", 100.0);

        repo.upsert_many(std::slice::from_ref(&btc)).await.unwrap();
        repo.upsert_many(std::slice::from_ref(&btc)).await.unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.read(&Symbol::new("BTC")).await.unwrap(), btc);
    }

    #[tokio::test]
    async fn failed_batch_writes_nothing() {
        let repo = InMemorySnapshotRepository::new();
        repo.fail_upserts_for(Symbol::new("ETH"));

        let err = repo
            .upsert_many(&[snapshot("BTC", 100.0), snapshot("ETH", 50.0)])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("ETH"));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn change_per_hour_reads_single_field() {
        let repo = InMemorySnapshotRepository::new();
        let btc = snapshot("BTC", 100.0);
        let hourly = RateAggregator::merge_hourly(&btc, 112.5, Timestamp::now());
        repo.insert(hourly);

        assert_eq!(
            repo.read_change_per_hour(&Symbol::new("BTC")).await.unwrap(),
            12.5
        );
    }

    #[tokio::test]
    async fn injected_read_failure_names_operation() {
        let repo = InMemorySnapshotRepository::new();
        repo.insert(snapshot("BTC", 100.0));
        repo.fail_reads(true);

        let err = repo
            .read_change_per_hour(&Symbol::new("BTC"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Persist {
                operation: StoreOperation::ReadChangePerHour,
                ..
            }
        ));
    }
}
