//! Chat renderings of stored rates.

use crate::domain::rate_aggregation::Snapshot;

/// Reply sent when the store cannot be read.
pub const STORE_FAILURE_REPLY: &str = "Something wrong. Please try again later.";

/// Reply sent when nothing has been stored yet.
pub const NO_RATES_REPLY: &str = "No rates available yet.";

/// `BTC = 100.00`
#[must_use]
pub fn format_rate(snapshot: &Snapshot) -> String {
    format!("{} = {:.2}", snapshot.name(), snapshot.price())
}

/// All rates on one line, or [`NO_RATES_REPLY`] when there are none.
#[must_use]
pub fn format_rates(snapshots: &[Snapshot]) -> String {
    if snapshots.is_empty() {
        return NO_RATES_REPLY.to_string();
    }
    snapshots
        .iter()
        .map(format_rate)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rate_aggregation::RateAggregator;
    use crate::domain::shared::{Symbol, Timestamp};

    fn snapshot(name: &str, price: f64) -> Snapshot {
        RateAggregator::merge(&Symbol::new(name), None, price, Timestamp::now())
    }

    #[test]
    fn single_rate_has_two_decimals() {
        assert_eq!(format_rate(&snapshot("BTC", 6_123_456.789)), "BTC = 6123456.79");
    }

    #[test]
    fn rates_are_space_separated() {
        let text = format_rates(&[snapshot("BTC", 100.0), snapshot("ETH", 50.5)]);
        assert_eq!(text, "BTC = 100.00 ETH = 50.50");
    }

    #[test]
    fn no_rates_reply() {
        assert_eq!(format_rates(&[]), NO_RATES_REPLY);
    }
}
