//! Telegram Bot API adapter.
//!
//! Long-polls `getUpdates` and answers through `sendMessage`.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::{BotError, ChatId, ChatTransport, IncomingMessage};
use crate::config::BotConfig;

/// Slack on top of the long-poll wait before the client gives up.
const REQUEST_SLACK: Duration = Duration::from_secs(10);

/// Telegram Bot API errors.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Network or HTTP error.
    #[error("Telegram HTTP error: {0}")]
    Http(String),

    /// API answered `ok: false`.
    #[error("Telegram API error: {description}")]
    Api {
        /// Error description from the API.
        description: String,
    },

    /// Response body could not be decoded.
    #[error("Telegram decode error: {0}")]
    Decode(String),
}

impl From<TelegramError> for BotError {
    fn from(err: TelegramError) -> Self {
        match err {
            TelegramError::Api { description } => Self::Rejected { description },
            other => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: ChatId,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: ChatId,
    text: &'a str,
}

/// `ChatTransport` over the Telegram Bot API.
#[derive(Debug)]
pub struct TelegramBotAdapter {
    client: reqwest::Client,
    /// `<api_url>/bot<token>`
    endpoint: String,
    poll_timeout: Duration,
    next_offset: AtomicI64,
}

impl TelegramBotAdapter {
    /// Create a new adapter.
    ///
    /// # Errors
    ///
    /// Returns `TelegramError::Http` if the HTTP client cannot be built.
    pub fn new(config: &BotConfig) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder()
            .timeout(config.poll_timeout().saturating_add(REQUEST_SLACK))
            .build()
            .map_err(|e| TelegramError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/bot{}", config.api_url.trim_end_matches('/'), config.token),
            poll_timeout: config.poll_timeout(),
            next_offset: AtomicI64::new(0),
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TelegramError> {
        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TelegramError::Decode(e.without_url().to_string()))?;

        if !body.ok {
            return Err(TelegramError::Api {
                description: body.description.unwrap_or_default(),
            });
        }

        body.result
            .ok_or_else(|| TelegramError::Decode("missing result".to_string()))
    }

    async fn get_updates(&self) -> Result<Vec<Update>, TelegramError> {
        let offset = self.next_offset.load(Ordering::SeqCst);
        let response = self
            .client
            .get(format!("{}/getUpdates", self.endpoint))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", self.poll_timeout.as_secs().to_string()),
            ])
            .send()
            .await
            .map_err(|e| TelegramError::Http(e.without_url().to_string()))?;

        let updates: Vec<Update> = Self::decode(response).await?;
        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.next_offset.store(last + 1, Ordering::SeqCst);
        }
        Ok(updates)
    }

    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        let response = self
            .client
            .post(format!("{}/sendMessage", self.endpoint))
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            .map_err(|e| TelegramError::Http(e.without_url().to_string()))?;

        let _: serde_json::Value = Self::decode(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for TelegramBotAdapter {
    async fn receive(&self) -> Result<Vec<IncomingMessage>, BotError> {
        let updates = self.get_updates().await?;
        Ok(updates
            .into_iter()
            .filter_map(|update| {
                let message = update.message?;
                Some(IncomingMessage {
                    chat_id: message.chat.id,
                    text: message.text?,
                })
            })
            .collect())
    }

    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), BotError> {
        self.send_message(chat_id, text).await.map_err(Into::into)
    }
}
