//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: the per-symbol rate `Snapshot` and its invariants
//! - **Value Objects**: `Symbol`, `Timestamp`, `SnapshotId`
//! - **Domain Services**: the stateless `RateAggregator`
//! - **Repository Traits**: the `SnapshotRepository` persistence abstraction
//!
//! # Bounded Contexts
//!
//! - [`rate_aggregation`]: running extrema and hourly change per symbol

pub mod rate_aggregation;
pub mod shared;
