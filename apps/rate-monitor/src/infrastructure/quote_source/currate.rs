//! Currate rates API adapter.
//!
//! `GET <base_url>?get=rates&pairs=BTCRUB,ETHRUB&key=<api key>` answers
//! `{"status": 200, "message": "rates", "data": {"BTCRUB": "6123456.78", ...}}`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{FetchError, QuoteSourcePort, RawQuotes, parse_price};
use crate::config::ProviderConfig;
use crate::domain::shared::Symbol;

const PROVIDER_OK: i64 = 200;

#[derive(Debug, Deserialize)]
struct RatesResponse {
    status: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Quote source backed by the Currate HTTP API.
#[derive(Debug)]
pub struct CurrateQuoteSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    quote_currency: String,
    symbols: Vec<Symbol>,
}

impl CurrateQuoteSource {
    /// Create a new adapter.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Network` if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::Network {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            quote_currency: config.quote_currency.to_uppercase(),
            symbols: config.symbols.iter().map(Symbol::new).collect(),
        })
    }

    fn pair(&self, symbol: &Symbol) -> String {
        symbol.pair_with(&self.quote_currency)
    }

    fn pairs(&self) -> String {
        self.symbols
            .iter()
            .map(|s| self.pair(s))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn extract_quotes(&self, response: RatesResponse) -> Result<RawQuotes, FetchError> {
        if response.status != PROVIDER_OK {
            return Err(FetchError::Provider {
                status: response.status,
                message: response.message,
            });
        }

        let serde_json::Value::Object(data) = response.data else {
            return Err(FetchError::MalformedBody {
                message: "data is not an object".to_string(),
            });
        };

        let mut quotes = RawQuotes::new();
        for symbol in &self.symbols {
            let pair = self.pair(symbol);
            let price = match data.get(&pair) {
                None | Some(serde_json::Value::Null) => {
                    return Err(FetchError::MissingSymbol { pair });
                }
                Some(serde_json::Value::String(raw)) => parse_price(&pair, raw)?,
                Some(other) => parse_price(&pair, &other.to_string())?,
            };
            quotes.insert(symbol.clone(), price);
        }
        Ok(quotes)
    }
}

#[async_trait]
impl QuoteSourcePort for CurrateQuoteSource {
    async fn fetch(&self) -> Result<RawQuotes, FetchError> {
        let pairs = self.pairs();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("get", "rates"),
                ("pairs", pairs.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Network {
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Network {
            message: e.without_url().to_string(),
        })?;
        let parsed: RatesResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::MalformedBody {
                message: e.to_string(),
            })?;

        let quotes = self.extract_quotes(parsed)?;
        tracing::debug!(pairs = %pairs, count = quotes.len(), "Fetched quotes");
        Ok(quotes)
    }
}
