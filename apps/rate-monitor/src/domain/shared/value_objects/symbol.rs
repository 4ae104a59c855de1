//! Symbol value object for rate identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// Maximum accepted symbol length.
const MAX_SYMBOL_LEN: usize = 12;

/// A short code identifying a tracked asset or currency.
///
/// Examples: "BTC", "ETH", "USD". The core treats it as an opaque key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol.
    ///
    /// The symbol is trimmed and normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Provider pair code for this symbol against a quote currency (`BTC` + `RUB` = `BTCRUB`).
    #[must_use]
    pub fn pair_with(&self, quote_currency: &str) -> String {
        format!("{}{}", self.0, quote_currency.to_uppercase())
    }

    /// Validate the symbol.
    ///
    /// # Errors
    ///
    /// Returns error if symbol is empty, too long or contains invalid characters.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            return Err(DomainError::invalid_value(
                "symbol",
                "Symbol cannot be empty",
            ));
        }

        if self.0.len() > MAX_SYMBOL_LEN {
            return Err(DomainError::invalid_value(
                "symbol",
                "Symbol exceeds maximum length",
            ));
        }

        if !self.0.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::invalid_value(
                "symbol",
                "Symbol contains invalid characters",
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_new_normalizes_case() {
        let s = Symbol::new("btc");
        assert_eq!(s.as_str(), "BTC");
    }

    #[test]
    fn symbol_new_trims_whitespace() {
        assert_eq!(Symbol::new(" eth ").as_str(), "ETH");
    }

    #[test]
    fn symbol_display() {
        let s = Symbol::new("ETH");
        assert_eq!(format!("{s}"), "ETH");
    }

    #[test]
    fn symbol_pair_with_quote_currency() {
        assert_eq!(Symbol::new("BTC").pair_with("rub"), "BTCRUB");
    }

    #[test]
    fn symbol_validate_ok() {
        assert!(Symbol::new("BTC").validate().is_ok());
    }

    #[test]
    fn symbol_validate_empty() {
        assert!(Symbol::new("").validate().is_err());
    }

    #[test]
    fn symbol_validate_too_long() {
        assert!(Symbol::new("A".repeat(20)).validate().is_err());
    }

    #[test]
    fn symbol_validate_invalid_chars() {
        assert!(Symbol::new("BT-C").validate().is_err());
        assert!(Symbol::new("B TC").validate().is_err());
    }

    #[test]
    fn symbol_serde_is_transparent() {
        let json = serde_json::to_string(&Symbol::new("BTC")).unwrap();
        assert_eq!(json, "\"BTC\"");
    }
}
