//! Rate Aggregation Bounded Context
//!
//! Maintains the latest snapshot per symbol: current price, running extrema
//! and the hour-over-hour change.
//!
//! # Key Concepts
//!
//! - **Snapshot Aggregate**: latest state for one symbol, `min <= price <= max`
//! - **Rate Aggregator**: pure merge of a fresh quote into the previous snapshot
//! - **Snapshot Repository**: the store that exclusively owns persisted state

pub mod aggregator;
pub mod errors;
pub mod repository;
pub mod snapshot;

pub use aggregator::RateAggregator;
pub use errors::{StoreError, StoreOperation};
pub use repository::SnapshotRepository;
pub use snapshot::{Snapshot, SnapshotParts};
