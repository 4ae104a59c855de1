//! Quote Source Port (Driven Port)
//!
//! Interface for pulling one snapshot of spot quotes from the pricing provider.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::shared::Symbol;

/// One fetched quote per configured symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuotes {
    prices: BTreeMap<Symbol, f64>,
}

impl RawQuotes {
    /// Create an empty quote set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a quote for a symbol.
    pub fn insert(&mut self, symbol: Symbol, price: f64) {
        self.prices.insert(symbol, price);
    }

    /// Quote for a symbol, if it was fetched.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<f64> {
        self.prices.get(symbol).copied()
    }

    /// Iterate over `(symbol, price)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, f64)> {
        self.prices.iter().map(|(symbol, price)| (symbol, *price))
    }

    /// Number of quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether no quote was fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(Symbol, f64)> for RawQuotes {
    fn from_iter<I: IntoIterator<Item = (Symbol, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Quote source error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Transport failure or client-side timeout.
    #[error("Quote provider unreachable: {message}")]
    Network {
        /// Error details.
        message: String,
    },

    /// Non-2xx HTTP response.
    #[error("Quote provider returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Body is not the expected JSON shape.
    #[error("Malformed quote provider response: {message}")]
    MalformedBody {
        /// Decoder error.
        message: String,
    },

    /// Provider reported an error in the body.
    #[error("Quote provider error {status}: {message}")]
    Provider {
        /// Provider status code.
        status: i64,
        /// Provider message.
        message: String,
    },

    /// A configured pair is absent from the response.
    #[error("Quote provider response lacks pair {pair}")]
    MissingSymbol {
        /// Provider pair code, e.g. `BTCRUB`.
        pair: String,
    },

    /// A price string is not a finite non-negative number.
    #[error("Invalid price for {pair}: {value:?}")]
    InvalidPrice {
        /// Provider pair code.
        pair: String,
        /// Raw value received.
        value: String,
    },
}

/// Parse a provider price string.
///
/// # Errors
///
/// Returns `FetchError::InvalidPrice` unless the value is a finite,
/// non-negative decimal.
pub fn parse_price(pair: &str, value: &str) -> Result<f64, FetchError> {
    let invalid = || FetchError::InvalidPrice {
        pair: pair.to_string(),
        value: value.to_string(),
    };

    let price: f64 = value.trim().parse().map_err(|_| invalid())?;
    if !price.is_finite() || price < 0.0 {
        return Err(invalid());
    }
    Ok(price)
}

/// Port for fetching quotes.
///
/// One outbound call per invocation, no retries, no caching. The result
/// holds exactly the configured symbol set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSourcePort: Send + Sync {
    /// Fetch the current quote for every configured symbol.
    ///
    /// # Errors
    ///
    /// Returns a `FetchError` describing why no complete quote set was obtained.
    async fn fetch(&self) -> Result<RawQuotes, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("100.0", 100.0 ; "decimal")]
    #[test_case("6123456.78", 6_123_456.78 ; "large")]
    #[test_case(" 42 ", 42.0 ; "padded integer")]
    #[test_case("0", 0.0 ; "zero")]
    fn parse_price_accepts(value: &str, expected: f64) {
        assert_eq!(parse_price("BTCRUB", value).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("abc" ; "text")]
    #[test_case("-1.5" ; "negative")]
    #[test_case("NaN" ; "nan")]
    #[test_case("inf" ; "infinite")]
    fn parse_price_rejects(value: &str) {
        let err = parse_price("BTCRUB", value).unwrap_err();
        assert_eq!(
            err,
            FetchError::InvalidPrice {
                pair: "BTCRUB".to_string(),
                value: value.to_string(),
            }
        );
    }

    #[test]
    fn raw_quotes_lookup() {
        let quotes: RawQuotes = [(Symbol::new("BTC"), 100.0), (Symbol::new("ETH"), 50.0)]
            .into_iter()
            .collect();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes.get(&Symbol::new("btc")), Some(100.0));
        assert_eq!(quotes.get(&Symbol::new("XRP")), None);
        let symbols: Vec<_> = quotes.iter().map(|(s, _)| s.as_str().to_string()).collect();
        assert_eq!(symbols, vec!["BTC", "ETH"]);
    }

    #[test]
    fn fetch_error_display() {
        let err = FetchError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Quote provider returned HTTP 502: bad gateway");
    }
}
