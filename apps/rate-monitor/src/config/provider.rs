//! Pricing provider configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Quote provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Rates endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Provider API key.
    #[serde(default)]
    pub api_key: String,
    /// Tracked symbols.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    /// Currency every symbol is quoted in.
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,
    /// Client-side request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            symbols: default_symbols(),
            quote_currency: default_quote_currency(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ProviderConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_base_url() -> String {
    "https://currate.ru/api/".to_string()
}

fn default_symbols() -> Vec<String> {
    vec!["BTC".to_string(), "ETH".to_string()]
}

fn default_quote_currency() -> String {
    "RUB".to_string()
}

const fn default_timeout_ms() -> u64 {
    3000
}
