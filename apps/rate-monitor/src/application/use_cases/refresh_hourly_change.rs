//! Refresh Hourly Change Use Case

use std::sync::Arc;

use super::MonitorError;
use crate::application::ports::QuoteSourcePort;
use crate::domain::rate_aggregation::{RateAggregator, Snapshot, SnapshotRepository};
use crate::domain::shared::Timestamp;

/// Use case for the hourly-change tick.
///
/// Recomputes `change_per_hour` for every stored snapshot against a fresh
/// quote. Stored symbols missing from the quote set are left as they are.
pub struct RefreshHourlyChangeUseCase<Q, R>
where
    Q: QuoteSourcePort,
    R: SnapshotRepository,
{
    quote_source: Arc<Q>,
    store: Arc<R>,
}

impl<Q, R> RefreshHourlyChangeUseCase<Q, R>
where
    Q: QuoteSourcePort,
    R: SnapshotRepository,
{
    /// Create a new `RefreshHourlyChangeUseCase`.
    pub const fn new(quote_source: Arc<Q>, store: Arc<R>) -> Self {
        Self {
            quote_source,
            store,
        }
    }

    /// Run one tick stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`RefreshHourlyChangeUseCase::execute_at`].
    pub async fn execute(&self) -> Result<usize, MonitorError> {
        self.execute_at(Timestamp::now()).await
    }

    /// Run one tick stamped with `now`. Returns the number of snapshots written.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Store` if reading or writing fails and
    /// `MonitorError::Fetch` if the quote source fails.
    pub async fn execute_at(&self, now: Timestamp) -> Result<usize, MonitorError> {
        let stored = self.store.read_all().await?;
        let quotes = self.quote_source.fetch().await?;

        let batch: Vec<Snapshot> = stored
            .iter()
            .filter_map(|snapshot| match quotes.get(snapshot.name()) {
                Some(price) => Some(RateAggregator::merge_hourly(snapshot, price, now)),
                None => {
                    tracing::debug!(symbol = %snapshot.name(), "No quote for stored symbol");
                    None
                }
            })
            .collect();

        if batch.is_empty() {
            return Ok(0);
        }

        self.store.upsert_many(&batch).await?;
        Ok(batch.len())
    }
}
