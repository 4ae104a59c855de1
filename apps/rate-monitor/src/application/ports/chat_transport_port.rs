//! Chat Transport Port (Driver Port)
//!
//! Interface through which chat commands arrive and replies leave.

use async_trait::async_trait;

/// Chat identifier assigned by the messaging platform.
pub type ChatId = i64;

/// A text message received from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Chat the message came from.
    pub chat_id: ChatId,
    /// Message text.
    pub text: String,
}

/// Chat bot error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BotError {
    /// The messaging platform could not be reached.
    #[error("Chat transport failure: {message}")]
    Transport {
        /// Error details.
        message: String,
    },

    /// The messaging platform rejected the request.
    #[error("Chat platform rejected request: {description}")]
    Rejected {
        /// Platform error description.
        description: String,
    },
}

/// Port for a conversational transport.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Wait for the next batch of incoming messages.
    ///
    /// May return an empty batch when the wait times out.
    ///
    /// # Errors
    ///
    /// Returns error if the platform cannot be reached.
    async fn receive(&self) -> Result<Vec<IncomingMessage>, BotError>;

    /// Send a text reply to a chat.
    ///
    /// # Errors
    ///
    /// Returns error if the message could not be delivered.
    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), BotError>;
}
