//! Rate DTOs

use serde::{Deserialize, Serialize};

use crate::domain::rate_aggregation::Snapshot;
use crate::domain::shared::Symbol;

/// DTO representing one stored rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateDto {
    /// Snapshot ID.
    pub currency_id: String,
    /// Symbol.
    pub currency_name: String,
    /// Current price.
    pub currency_price: f64,
    /// Running minimum.
    pub currency_min_price: f64,
    /// Running maximum.
    pub currency_max_price: f64,
    /// Hour-over-hour change.
    pub currency_change_per_hour: f64,
    /// Last update (RFC 3339).
    pub currency_last_update: String,
}

impl From<&Snapshot> for RateDto {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            currency_id: snapshot.id().to_string(),
            currency_name: snapshot.name().to_string(),
            currency_price: snapshot.price(),
            currency_min_price: snapshot.min_price(),
            currency_max_price: snapshot.max_price(),
            currency_change_per_hour: snapshot.change_per_hour(),
            currency_last_update: snapshot.last_update().to_rfc3339(),
        }
    }
}

/// DTO carrying only the hourly change of one rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePerHourDto {
    /// Symbol.
    pub currency_name: String,
    /// Hour-over-hour change.
    pub currency_change_per_hour: f64,
}

impl ChangePerHourDto {
    /// Create from a symbol and its change.
    #[must_use]
    pub fn new(symbol: &Symbol, change_per_hour: f64) -> Self {
        Self {
            currency_name: symbol.to_string(),
            currency_change_per_hour: change_per_hour,
        }
    }
}
