//! Rate Aggregator Domain Service
//!
//! Pure computation of the next snapshot from the previous one and a fresh quote.
//! The aggregator never touches storage.

use super::snapshot::Snapshot;
use crate::domain::shared::{SnapshotId, Symbol, Timestamp};

/// Stateless domain service merging quotes into snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateAggregator;

impl RateAggregator {
    /// Merge a monitor-tick quote into the previous snapshot.
    ///
    /// - No previous snapshot: the quote becomes price, minimum and maximum,
    ///   with zero hourly change.
    /// - Otherwise the price is replaced and the extrema widened.
    ///   `change_per_hour` is carried over untouched; only
    ///   [`RateAggregator::merge_hourly`] recomputes it.
    #[must_use]
    pub fn merge(
        name: &Symbol,
        previous: Option<&Snapshot>,
        raw_price: f64,
        now: Timestamp,
    ) -> Snapshot {
        debug_assert!(raw_price.is_finite() && raw_price >= 0.0);

        match previous {
            None => Snapshot {
                id: SnapshotId::generate(),
                name: name.clone(),
                price: raw_price,
                min_price: raw_price,
                max_price: raw_price,
                change_per_hour: 0.0,
                last_update: now,
            },
            Some(prev) => Snapshot {
                id: prev.id,
                name: prev.name.clone(),
                price: raw_price,
                min_price: prev.min_price.min(raw_price),
                max_price: prev.max_price.max(raw_price),
                change_per_hour: prev.change_per_hour,
                last_update: now,
            },
        }
    }

    /// Recompute the hour-over-hour change.
    ///
    /// `change_per_hour = raw_price - previous.price`. Price and extrema are
    /// left as recorded; they belong to the monitor tick.
    #[must_use]
    pub fn merge_hourly(previous: &Snapshot, raw_price: f64, now: Timestamp) -> Snapshot {
        debug_assert!(raw_price.is_finite());

        Snapshot {
            change_per_hour: raw_price - previous.price,
            last_update: now,
            ..previous.clone()
        }
    }
}
