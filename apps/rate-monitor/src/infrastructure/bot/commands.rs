//! Chat command parsing.

use crate::domain::shared::Symbol;

/// Help text for `/start`.
pub const HELP_TEXT: &str = "The bot supports several commands. \
The /rates command without parameters will display all tracked rates. \
The /rates command with a currency parameter (for example /rates BTC) will display the rate of the selected currency. \
The /start_auto {minutes} command will automatically send the exchange rates. \
The /stop_auto command will cancel /start_auto.";

/// Longest accepted `/start_auto` period: one week.
pub const MAX_AUTO_MINUTES: u64 = 7 * 24 * 60;

/// A recognised chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// `/start`
    Start,
    /// `/rates` or `/rates <symbol>`
    Rates(Option<Symbol>),
    /// `/start_auto <minutes>`
    StartAuto {
        /// Minutes between messages.
        minutes: u64,
    },
    /// `/stop_auto`
    StopAuto,
}

/// A command with bad arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// `/rates` with more than one argument.
    #[error("wrong arguments count")]
    RatesArguments,
    /// `/start_auto` argument is not a whole number in `1..=MAX_AUTO_MINUTES`.
    #[error("Invalid parametr type. Only numbers.")]
    NotANumber,
    /// `/start_auto` without exactly one argument.
    #[error("Invalid parametrs count.")]
    StartAutoArguments,
}

impl ChatCommand {
    /// Parse a message. `Ok(None)` means the text is not a known command.
    ///
    /// Accepts the `/command@botname` form used in group chats.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` for a known command with bad arguments; its
    /// `Display` text is the reply.
    pub fn parse(text: &str) -> Result<Option<Self>, CommandError> {
        let mut words = text.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let command = head.split('@').next().unwrap_or(head);
        let args: Vec<&str> = words.collect();

        let parsed = match command {
            "/start" => Self::Start,
            "/rates" => match args.as_slice() {
                [] => Self::Rates(None),
                [symbol] => Self::Rates(Some(Symbol::new(*symbol))),
                _ => return Err(CommandError::RatesArguments),
            },
            "/start_auto" => match args.as_slice() {
                [minutes] => match minutes.parse::<u64>() {
                    Ok(minutes) if (1..=MAX_AUTO_MINUTES).contains(&minutes) => {
                        Self::StartAuto { minutes }
                    }
                    _ => return Err(CommandError::NotANumber),
                },
                _ => return Err(CommandError::StartAutoArguments),
            },
            "/stop_auto" => Self::StopAuto,
            _ => return Ok(None),
        };
        Ok(Some(parsed))
    }
}
