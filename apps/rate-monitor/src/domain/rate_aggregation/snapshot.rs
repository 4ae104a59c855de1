//! Rate Snapshot Aggregate
//!
//! The latest persisted aggregate state for one symbol.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{DomainError, SnapshotId, Symbol, Timestamp};

/// Latest aggregate state for one symbol.
///
/// # Invariants
///
/// - `min_price <= price <= max_price`
/// - `price` is finite and non-negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub(super) id: SnapshotId,
    pub(super) name: Symbol,
    pub(super) price: f64,
    pub(super) min_price: f64,
    pub(super) max_price: f64,
    pub(super) change_per_hour: f64,
    pub(super) last_update: Timestamp,
}

/// Raw field values used to rebuild a snapshot from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotParts {
    /// Row identifier.
    pub id: SnapshotId,
    /// Symbol.
    pub name: Symbol,
    /// Current price.
    pub price: f64,
    /// Running minimum.
    pub min_price: f64,
    /// Running maximum.
    pub max_price: f64,
    /// Hour-over-hour change.
    pub change_per_hour: f64,
    /// Time of the last write.
    pub last_update: Timestamp,
}

impl Snapshot {
    /// Rebuild a snapshot from stored values, checking the aggregate invariants.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if the values are inconsistent.
    pub fn reconstitute(parts: SnapshotParts) -> Result<Self, DomainError> {
        let snapshot = Self {
            id: parts.id,
            name: parts.name,
            price: parts.price,
            min_price: parts.min_price,
            max_price: parts.max_price,
            change_per_hour: parts.change_per_hour,
            last_update: parts.last_update,
        };
        snapshot.check_invariants()?;
        Ok(snapshot)
    }

    /// Row identifier.
    #[must_use]
    pub const fn id(&self) -> SnapshotId {
        self.id
    }

    /// Symbol this snapshot belongs to.
    #[must_use]
    pub const fn name(&self) -> &Symbol {
        &self.name
    }

    /// Latest quote.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Lowest quote observed since the snapshot was created.
    #[must_use]
    pub const fn min_price(&self) -> f64 {
        self.min_price
    }

    /// Highest quote observed since the snapshot was created.
    #[must_use]
    pub const fn max_price(&self) -> f64 {
        self.max_price
    }

    /// Absolute price change measured at the last hourly evaluation.
    #[must_use]
    pub const fn change_per_hour(&self) -> f64 {
        self.change_per_hour
    }

    /// Time of the last merge.
    #[must_use]
    pub const fn last_update(&self) -> Timestamp {
        self.last_update
    }

    /// Check `min_price <= price <= max_price` and price validity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` describing the broken invariant.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(self.violation("price is finite and non-negative"));
        }
        if !(self.min_price <= self.price && self.price <= self.max_price) {
            return Err(self.violation("min_price <= price <= max_price"));
        }
        if !self.change_per_hour.is_finite() {
            return Err(self.violation("change_per_hour is finite"));
        }
        Ok(())
    }

    fn violation(&self, invariant: &str) -> DomainError {
        DomainError::InvariantViolation {
            aggregate: "Snapshot".to_string(),
            invariant: invariant.to_string(),
            state: format!(
                "{} price={} min={} max={} change={}",
                self.name, self.price, self.min_price, self.max_price, self.change_per_hour
            ),
        }
    }
}
