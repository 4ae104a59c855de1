//! Use case errors.

use thiserror::Error;

use crate::application::ports::FetchError;
use crate::domain::rate_aggregation::StoreError;

/// Failure of a monitor or hourly-change tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// The quote source failed; nothing was written.
    #[error("Quote fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The store failed.
    #[error("Store failed: {0}")]
    Store(#[from] StoreError),
}
