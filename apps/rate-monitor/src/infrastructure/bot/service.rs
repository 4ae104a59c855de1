//! Chat bot service.
//!
//! Answers chat commands from the store and manages per-chat auto senders.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::commands::{ChatCommand, CommandError, HELP_TEXT};
use crate::application::dto::{STORE_FAILURE_REPLY, format_rate, format_rates};
use crate::application::ports::{ChatTransport, IncomingMessage};
use crate::application::services::AutoSender;
use crate::application::use_cases::QueryRatesUseCase;
use crate::domain::rate_aggregation::SnapshotRepository;

/// Reply to `/stop_auto`.
pub const AUTOSENDER_STOPPED_REPLY: &str = "Autosender deactivated.";

/// Pause after a failed poll before trying again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Chat bot: polls the transport, answers commands.
pub struct BotService<T, R>
where
    T: ChatTransport + 'static,
    R: SnapshotRepository + 'static,
{
    transport: Arc<T>,
    query: QueryRatesUseCase<R>,
    auto_sender: AutoSender<T, R>,
    shutdown: CancellationToken,
}

impl<T, R> BotService<T, R>
where
    T: ChatTransport + 'static,
    R: SnapshotRepository + 'static,
{
    /// Create a bot service. Cancelling `shutdown` stops polling and every auto sender.
    #[must_use]
    pub fn new(transport: Arc<T>, query: QueryRatesUseCase<R>, shutdown: CancellationToken) -> Self {
        let auto_sender = AutoSender::new(Arc::clone(&transport), query.clone(), shutdown.clone());
        Self {
            transport,
            query,
            auto_sender,
            shutdown,
        }
    }

    /// Reply for one message, or `None` if it is not a command.
    pub async fn handle(&self, message: &IncomingMessage) -> Option<String> {
        let command = match ChatCommand::parse(&message.text) {
            Ok(Some(command)) => command,
            Ok(None) => return None,
            Err(e) => return Some(e.to_string()),
        };

        tracing::debug!(chat_id = message.chat_id, command = ?command, "Chat command");

        let reply = match command {
            ChatCommand::Start => HELP_TEXT.to_string(),
            ChatCommand::Rates(None) => match self.query.all().await {
                Ok(snapshots) => format_rates(&snapshots),
                Err(e) => {
                    tracing::warn!(chat_id = message.chat_id, error = %e, "Rates lookup failed");
                    STORE_FAILURE_REPLY.to_string()
                }
            },
            ChatCommand::Rates(Some(symbol)) => match self.query.one(&symbol).await {
                Ok(snapshot) => format_rate(&snapshot),
                Err(e) => {
                    if e.is_not_found() {
                        tracing::info!(chat_id = message.chat_id, symbol = %symbol, "Unknown currency requested");
                    } else {
                        tracing::warn!(chat_id = message.chat_id, symbol = %symbol, error = %e, "Rate lookup failed");
                    }
                    STORE_FAILURE_REPLY.to_string()
                }
            },
            ChatCommand::StartAuto { minutes } => {
                let started = minutes
                    .checked_mul(60)
                    .map(Duration::from_secs)
                    .is_some_and(|period| self.auto_sender.start(message.chat_id, period));
                if started {
                    format!("Autosender activated. Rates every {minutes} min.")
                } else {
                    CommandError::NotANumber.to_string()
                }
            }
            ChatCommand::StopAuto => {
                self.auto_sender.stop(message.chat_id);
                AUTOSENDER_STOPPED_REPLY.to_string()
            }
        };
        Some(reply)
    }

    /// Poll until shutdown.
    pub async fn run(&self) {
        tracing::info!("Chat bot started");

        loop {
            tokio::select! {
                received = self.transport.receive() => match received {
                    Ok(messages) => {
                        for message in messages {
                            self.reply(&message).await;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Chat poll failed");
                        tokio::select! {
                            () = tokio::time::sleep(RETRY_DELAY) => {}
                            () = self.shutdown.cancelled() => break,
                        }
                    }
                },
                () = self.shutdown.cancelled() => break,
            }
        }

        tracing::info!("Chat bot shutting down");
    }

    async fn reply(&self, message: &IncomingMessage) {
        let Some(reply) = self.handle(message).await else {
            return;
        };
        if let Err(e) = self.transport.send(message.chat_id, &reply).await {
            tracing::warn!(chat_id = message.chat_id, error = %e, "Reply delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::application::ports::{BotError, ChatId};
    use crate::domain::rate_aggregation::RateAggregator;
    use crate::domain::shared::{Symbol, Timestamp};
    use crate::infrastructure::persistence::InMemorySnapshotRepository;

    /// Transport that delivers one scripted batch, then idles.
    #[derive(Default)]
    struct ScriptedTransport {
        inbox: Mutex<Vec<IncomingMessage>>,
        sent: Mutex<Vec<(ChatId, String)>>,
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn receive(&self) -> Result<Vec<IncomingMessage>, BotError> {
            let batch = std::mem::take(&mut *self.inbox.lock());
            if batch.is_empty() {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            Ok(batch)
        }

        async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), BotError> {
            self.sent.lock().push((chat_id, text.to_string()));
            Ok(())
        }
    }

    fn message(text: &str) -> IncomingMessage {
        IncomingMessage {
            chat_id: 42,
            text: text.to_string(),
        }
    }

    fn bot() -> (
        Arc<ScriptedTransport>,
        Arc<InMemorySnapshotRepository>,
        BotService<ScriptedTransport, InMemorySnapshotRepository>,
        CancellationToken,
    ) {
        let store = Arc::new(InMemorySnapshotRepository::new());
        let now = Timestamp::now();
        store.insert(RateAggregator::merge(&Symbol::new("BTC"), None, 6_123_456.789, now));
        store.insert(RateAggregator::merge(&Symbol::new("ETH"), None, 250_000.5, now));
        let transport = Arc::new(ScriptedTransport::default());
        let shutdown = CancellationToken::new();
        let service = BotService::new(
            Arc::clone(&transport),
            QueryRatesUseCase::new(Arc::clone(&store)),
            shutdown.clone(),
        );
        (transport, store, service, shutdown)
    }

    #[tokio::test]
    async fn start_replies_with_help() {
        let (_, _, bot, _) = bot();
        assert_eq!(bot.handle(&message("/start")).await.unwrap(), HELP_TEXT);
    }

    #[tokio::test]
    async fn rates_lists_every_symbol() {
        let (_, _, bot, _) = bot();
        assert_eq!(
            bot.handle(&message("/rates")).await.unwrap(),
            "BTC = 6123456.79 ETH = 250000.50"
        );
    }

    #[tokio::test]
    async fn rates_for_one_symbol() {
        let (_, _, bot, _) = bot();
        assert_eq!(
            bot.handle(&message("/rates eth")).await.unwrap(),
            "ETH = 250000.50"
        );
    }

    #[tokio::test]
    async fn unknown_symbol_gets_failure_reply() {
        let (_, _, bot, _) = bot();
        assert_eq!(
            bot.handle(&message("/rates DOGE")).await.unwrap(),
            STORE_FAILURE_REPLY
        );
    }

    #[tokio::test]
    async fn store_failure_gets_failure_reply() {
        let (_, store, bot, _) = bot();
        store.fail_reads(true);
        assert_eq!(
            bot.handle(&message("/rates")).await.unwrap(),
            STORE_FAILURE_REPLY
        );
    }

    #[tokio::test]
    async fn bad_arguments_get_their_own_reply() {
        let (_, _, bot, _) = bot();
        assert_eq!(
            bot.handle(&message("/start_auto soon")).await.unwrap(),
            "Invalid parametr type. Only numbers."
        );
        assert_eq!(
            bot.handle(&message("/rates A B")).await.unwrap(),
            "wrong arguments count"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_auto_period_is_refused() {
        let (transport, _, bot, _) = bot();

        for minutes in ["160000000000000000", "307445734561825861", "10081"] {
            assert_eq!(
                bot.handle(&message(&format!("/start_auto {minutes}")))
                    .await
                    .unwrap(),
                "Invalid parametr type. Only numbers."
            );
        }
        assert_eq!(bot.auto_sender.active_count(), 0);

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(transport.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn plain_text_is_ignored() {
        let (_, _, bot, _) = bot();
        assert!(bot.handle(&message("hi there")).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn auto_sender_lifecycle() {
        let (transport, _, bot, _) = bot();

        let started = bot.handle(&message("/start_auto 1")).await.unwrap();
        assert!(started.contains("every 1 min"));
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(transport.sent.lock().len(), 1);

        assert_eq!(
            bot.handle(&message("/stop_auto")).await.unwrap(),
            AUTOSENDER_STOPPED_REPLY
        );
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(transport.sent.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_replies_until_shutdown() {
        let (transport, _, bot, shutdown) = bot();
        transport.inbox.lock().push(message("/rates BTC"));
        let bot = Arc::new(bot);

        let handle = tokio::spawn({
            let bot = Arc::clone(&bot);
            async move { bot.run().await }
        });
        tokio::time::sleep(Duration::from_secs(3)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert_eq!(
            *transport.sent.lock(),
            vec![(42, "BTC = 6123456.79".to_string())]
        );
    }
}
