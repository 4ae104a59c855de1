//! Auto Sender Service
//!
//! Periodically pushes all stored rates to chats that asked for it.
//! One task per chat; each owns a child of the service's shutdown token.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::application::dto::{STORE_FAILURE_REPLY, format_rates};
use crate::application::ports::{ChatId, ChatTransport};
use crate::application::use_cases::QueryRatesUseCase;
use crate::domain::rate_aggregation::SnapshotRepository;

/// Repeating rate sender, one task per chat.
pub struct AutoSender<T, R>
where
    T: ChatTransport + 'static,
    R: SnapshotRepository + 'static,
{
    transport: Arc<T>,
    query: QueryRatesUseCase<R>,
    tasks: Mutex<HashMap<ChatId, CancellationToken>>,
    shutdown: CancellationToken,
}

impl<T, R> AutoSender<T, R>
where
    T: ChatTransport + 'static,
    R: SnapshotRepository + 'static,
{
    /// Create an auto sender. Cancelling `shutdown` stops every task.
    #[must_use]
    pub fn new(transport: Arc<T>, query: QueryRatesUseCase<R>, shutdown: CancellationToken) -> Self {
        Self {
            transport,
            query,
            tasks: Mutex::new(HashMap::new()),
            shutdown,
        }
    }

    /// Start sending rates to `chat_id` every `period`, replacing any
    /// sender already running for that chat. The first message goes out
    /// after one period.
    ///
    /// Returns `false`, leaving any running sender untouched, if `period`
    /// is zero or the first deadline cannot be represented.
    pub fn start(&self, chat_id: ChatId, period: Duration) -> bool {
        let Some(first_tick) = Instant::now().checked_add(period).filter(|_| !period.is_zero())
        else {
            tracing::warn!(chat_id, period_secs = period.as_secs(), "Auto sender period rejected");
            return false;
        };

        let token = self.shutdown.child_token();
        if let Some(previous) = self.tasks.lock().insert(chat_id, token.clone()) {
            previous.cancel();
        }

        tracing::info!(chat_id, period_secs = period.as_secs(), "Auto sender started");

        let transport = Arc::clone(&self.transport);
        let query = self.query.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let text = match query.all().await {
                            Ok(snapshots) => format_rates(&snapshots),
                            Err(e) => {
                                tracing::warn!(chat_id, error = %e, "Auto sender could not read rates");
                                STORE_FAILURE_REPLY.to_string()
                            }
                        };
                        if let Err(e) = transport.send(chat_id, &text).await {
                            tracing::warn!(chat_id, error = %e, "Auto sender delivery failed");
                        }
                    }
                    () = token.cancelled() => {
                        tracing::debug!(chat_id, "Auto sender stopped");
                        break;
                    }
                }
            }
        });
        true
    }

    /// Stop the sender for `chat_id`. Returns whether one was running.
    pub fn stop(&self, chat_id: ChatId) -> bool {
        self.tasks.lock().remove(&chat_id).is_some_and(|token| {
            token.cancel();
            true
        })
    }

    /// Number of chats with an active sender.
    pub fn active_count(&self) -> usize {
        self.tasks.lock().values().filter(|t| !t.is_cancelled()).count()
    }
}
