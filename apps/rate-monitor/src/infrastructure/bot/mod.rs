//! Chat bot adapter.
//!
//! Inbound adapter answering chat commands: command parsing, the bot
//! service, and the Telegram transport.

mod commands;
mod service;
mod telegram;

pub use commands::{ChatCommand, CommandError, HELP_TEXT};
pub use service::{AUTOSENDER_STOPPED_REPLY, BotService};
pub use telegram::{TelegramBotAdapter, TelegramError};
