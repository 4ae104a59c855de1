//! Monitor Rates Use Case
//!
//! One monitor tick: fetch quotes, merge each into the stored snapshot,
//! write the batch.

use std::sync::Arc;

use super::MonitorError;
use crate::application::ports::QuoteSourcePort;
use crate::domain::rate_aggregation::{RateAggregator, Snapshot, SnapshotRepository, StoreError};
use crate::domain::shared::Timestamp;

/// Use case for the monitor tick.
pub struct MonitorRatesUseCase<Q, R>
where
    Q: QuoteSourcePort,
    R: SnapshotRepository,
{
    quote_source: Arc<Q>,
    store: Arc<R>,
}

impl<Q, R> MonitorRatesUseCase<Q, R>
where
    Q: QuoteSourcePort,
    R: SnapshotRepository,
{
    /// Create a new `MonitorRatesUseCase`.
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
    /// See [`MonitorRatesUseCase::execute_at`].
    pub async fn execute(&self) -> Result<usize, MonitorError> {
        self.execute_at(Timestamp::now()).await
    }

    /// Run one tick stamped with `now`. Returns the number of snapshots written.
    ///
    /// A symbol with no stored snapshot is a first observation. Any other
    /// read failure abandons the tick before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Fetch` if the quote source fails and
    /// `MonitorError::Store` if a read or the batch write fails.
    pub async fn execute_at(&self, now: Timestamp) -> Result<usize, MonitorError> {
        let quotes = self.quote_source.fetch().await?;

        let mut batch: Vec<Snapshot> = Vec::with_capacity(quotes.len());
        for (symbol, price) in quotes.iter() {
            let previous = match self.store.read(symbol).await {
                Ok(snapshot) => Some(snapshot),
                Err(StoreError::NotFound { .. }) => None,
                Err(e) => return Err(e.into()),
            };

            let next = RateAggregator::merge(symbol, previous.as_ref(), price, now);
            tracing::trace!(
                symbol = %symbol,
                price = next.price(),
                min = next.min_price(),
                max = next.max_price(),
                "Merged quote"
            );
            batch.push(next);
        }

        self.store.upsert_many(&batch).await?;
        Ok(batch.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{FetchError, MockQuoteSourcePort, RawQuotes};
    use crate::domain::rate_aggregation::{SnapshotParts, StoreOperation};
    use crate::domain::shared::{SnapshotId, Symbol};
    use crate::infrastructure::persistence::InMemorySnapshotRepository;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn quotes(pairs: &[(&str, f64)]) -> RawQuotes {
        pairs.iter().map(|(s, p)| (Symbol::new(*s), *p)).collect()
    }

    fn source_returning(result: Result<RawQuotes, FetchError>) -> Arc<MockQuoteSourcePort> {
        let mut source = MockQuoteSourcePort::new();
        source.expect_fetch().times(1).return_once(move || result);
        Arc::new(source)
    }

    fn stored(name: &str, price: f64, min_price: f64, max_price: f64) -> Snapshot {
        Snapshot::reconstitute(SnapshotParts {
            id: SnapshotId::generate(),
            name: Symbol::new(name),
            price,
            min_price,
            max_price,
            change_per_hour: 0.0,
            last_update: ts("2024-04-16T11:00:00Z"),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn empty_store_gets_first_observations() {
        let store = Arc::new(InMemorySnapshotRepository::new());
        let source = source_returning(Ok(quotes(&[("BTC", 100.0), ("ETH", 50.0)])));
        let use_case = MonitorRatesUseCase::new(source, Arc::clone(&store));

        let written = use_case
            .execute_at(ts("2024-04-16T12:00:00Z"))
            .await
            .unwrap();

        assert_eq!(written, 2);
        let btc = store.read(&Symbol::new("BTC")).await.unwrap();
        assert_eq!(
            (btc.price(), btc.min_price(), btc.max_price()),
            (100.0, 100.0, 100.0)
        );
        assert_eq!(btc.change_per_hour(), 0.0);
        let eth = store.read(&Symbol::new("ETH")).await.unwrap();
        assert_eq!(
            (eth.price(), eth.min_price(), eth.max_price()),
            (50.0, 50.0, 50.0)
        );
    }

    #[tokio::test]
    async fn lower_quote_moves_minimum() {
        let store = Arc::new(InMemorySnapshotRepository::new());
        let existing = stored("BTC", 100.0, 90.0, 110.0);
        store.insert(existing.clone());
        let source = source_returning(Ok(quotes(&[("BTC", 85.0)])));
        let use_case = MonitorRatesUseCase::new(source, Arc::clone(&store));

        use_case
            .execute_at(ts("2024-04-16T12:00:00Z"))
            .await
            .unwrap();

        let btc = store.read(&Symbol::new("BTC")).await.unwrap();
        assert_eq!(
            (btc.price(), btc.min_price(), btc.max_price()),
            (85.0, 85.0, 110.0)
        );
        assert_eq!(btc.id(), existing.id());
        assert_eq!(btc.last_update(), ts("2024-04-16T12:00:00Z"));
    }

    #[tokio::test]
    async fn fetch_failure_leaves_store_unchanged() {
        let store = Arc::new(InMemorySnapshotRepository::new());
        let existing = stored("BTC", 100.0, 90.0, 110.0);
        store.insert(existing.clone());
        let source = source_returning(Err(FetchError::Network {
            message: "timed out".to_string(),
        }));
        let use_case = MonitorRatesUseCase::new(source, Arc::clone(&store));

        let err = use_case.execute().await.unwrap_err();

        assert!(matches!(err, MonitorError::Fetch(FetchError::Network { .. })));
        assert_eq!(store.read(&Symbol::new("BTC")).await.unwrap(), existing);
    }

    #[tokio::test]
    async fn read_failure_abandons_tick() {
        let store = Arc::new(InMemorySnapshotRepository::new());
        store.fail_reads(true);
        let source = source_returning(Ok(quotes(&[("BTC", 100.0)])));
        let use_case = MonitorRatesUseCase::new(source, Arc::clone(&store));

        let err = use_case.execute().await.unwrap_err();

        assert!(matches!(
            err,
            MonitorError::Store(StoreError::Persist {
                operation: StoreOperation::Read,
                ..
            })
        ));
        store.fail_reads(false);
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_failure_is_reported_with_symbol() {
        let store = Arc::new(InMemorySnapshotRepository::new());
        store.fail_upserts_for(Symbol::new("ETH"));
        let source = source_returning(Ok(quotes(&[("BTC", 100.0), ("ETH", 50.0)])));
        let use_case = MonitorRatesUseCase::new(source, Arc::clone(&store));

        let err = use_case.execute().await.unwrap_err();

        match err {
            MonitorError::Store(StoreError::Persist { symbol, .. }) => {
                assert_eq!(symbol, Some(Symbol::new("ETH")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.read_all().await.unwrap().is_empty());
    }
}
