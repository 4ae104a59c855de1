//! Chat bot configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Telegram bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Run the bot.
    #[serde(default)]
    pub enabled: bool,
    /// Bot API token.
    #[serde(default)]
    pub token: String,
    /// Bot API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Long-poll wait in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: String::new(),
            api_url: default_api_url(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

impl BotConfig {
    /// Long-poll wait as a `Duration`.
    #[must_use]
    pub const fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

const fn default_poll_timeout() -> u64 {
    10
}
