//! Rate Scheduler Service
//!
//! Drives the two periodic triggers: the monitor tick and the hourly-change
//! tick. Each trigger runs in its own task; a tick body is awaited inline,
//! so ticks of the same trigger never overlap and late ticks are delayed
//! rather than bursted.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::ports::QuoteSourcePort;
use crate::application::use_cases::{
    MonitorError, MonitorRatesUseCase, RefreshHourlyChangeUseCase,
};
use crate::domain::rate_aggregation::SnapshotRepository;

/// Trigger periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Period of the monitor tick.
    pub monitor_interval: Duration,
    /// Period of the hourly-change tick.
    pub hourly_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            monitor_interval: Duration::from_secs(60),
            hourly_interval: Duration::from_secs(3600),
        }
    }
}

/// Owner of the periodic triggers.
pub struct RateScheduler<Q, R>
where
    Q: QuoteSourcePort + 'static,
    R: SnapshotRepository + 'static,
{
    config: SchedulerConfig,
    monitor: Arc<MonitorRatesUseCase<Q, R>>,
    hourly: Arc<RefreshHourlyChangeUseCase<Q, R>>,
    shutdown: CancellationToken,
}

impl<Q, R> RateScheduler<Q, R>
where
    Q: QuoteSourcePort + 'static,
    R: SnapshotRepository + 'static,
{
    /// Create a scheduler over a quote source and a store.
    #[must_use]
    pub fn new(
        config: SchedulerConfig,
        quote_source: Arc<Q>,
        store: Arc<R>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            monitor: Arc::new(MonitorRatesUseCase::new(
                Arc::clone(&quote_source),
                Arc::clone(&store),
            )),
            hourly: Arc::new(RefreshHourlyChangeUseCase::new(quote_source, store)),
            shutdown,
        }
    }

    /// Spawn both trigger loops. Both fire once immediately, then every period.
    ///
    /// The loops exit when the shutdown token is cancelled; a tick already
    /// in flight completes first.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        tracing::info!(
            monitor_interval_secs = self.config.monitor_interval.as_secs(),
            hourly_interval_secs = self.config.hourly_interval.as_secs(),
            "Starting rate scheduler"
        );

        let monitor = Arc::clone(&self.monitor);
        let monitor_loop = run_trigger(
            "monitor",
            self.config.monitor_interval,
            self.shutdown.clone(),
            move || {
                let monitor = Arc::clone(&monitor);
                async move { monitor.execute().await }
            },
        );

        let hourly = Arc::clone(&self.hourly);
        let hourly_loop = run_trigger(
            "hourly_change",
            self.config.hourly_interval,
            self.shutdown.clone(),
            move || {
                let hourly = Arc::clone(&hourly);
                async move { hourly.execute().await }
            },
        );

        vec![tokio::spawn(monitor_loop), tokio::spawn(hourly_loop)]
    }
}

async fn run_trigger<F, Fut>(
    trigger: &'static str,
    period: Duration,
    shutdown: CancellationToken,
    mut tick: F,
) where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<usize, MonitorError>> + Send,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match tick().await {
                    Ok(written) => {
                        tracing::debug!(trigger, written, "Tick complete");
                    }
                    Err(e) => {
                        tracing::warn!(trigger, error = %e, "Tick abandoned");
                    }
                }
            }
            () = shutdown.cancelled() => {
                tracing::info!(trigger, "Trigger loop shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::application::ports::{FetchError, RawQuotes};
    use crate::domain::shared::Symbol;
    use crate::infrastructure::persistence::InMemorySnapshotRepository;

    /// Quote source whose first `failures` calls fail.
    struct ScriptedSource {
        calls: AtomicUsize,
        failures: usize,
        price: f64,
    }

    impl ScriptedSource {
        fn new(failures: usize, price: f64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures,
                price,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteSourcePort for ScriptedSource {
        async fn fetch(&self) -> Result<RawQuotes, FetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(FetchError::Network {
                    message: "connection refused".to_string(),
                });
            }
            Ok([(Symbol::new("BTC"), self.price)].into_iter().collect())
        }
    }

    fn config(monitor_secs: u64, hourly_secs: u64) -> SchedulerConfig {
        SchedulerConfig {
            monitor_interval: Duration::from_secs(monitor_secs),
            hourly_interval: Duration::from_secs(hourly_secs),
        }
    }

    async fn stop(shutdown: &CancellationToken, handles: Vec<JoinHandle<()>>) {
        shutdown.cancel();
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[test]
    fn default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.monitor_interval, Duration::from_secs(60));
        assert_eq!(config.hourly_interval, Duration::from_secs(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn triggers_fire_immediately_then_every_period() {
        let source = Arc::new(ScriptedSource::new(0, 100.0));
        let store = Arc::new(InMemorySnapshotRepository::new());
        let shutdown = CancellationToken::new();
        let scheduler = RateScheduler::new(
            config(10, 3600),
            Arc::clone(&source),
            Arc::clone(&store),
            shutdown.clone(),
        );

        let handles = scheduler.start();
        tokio::time::sleep(Duration::from_secs(25)).await;
        stop(&shutdown, handles).await;

        // monitor at 0s, 10s, 20s plus one hourly tick at 0s
        assert_eq!(source.calls(), 4);
        let btc = store.read(&Symbol::new("BTC")).await.unwrap();
        assert_eq!(btc.price(), 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_tick_does_not_stop_the_loop() {
        let source = Arc::new(ScriptedSource::new(2, 42.0));
        let store = Arc::new(InMemorySnapshotRepository::new());
        let shutdown = CancellationToken::new();
        let scheduler = RateScheduler::new(
            config(10, 3600),
            Arc::clone(&source),
            Arc::clone(&store),
            shutdown.clone(),
        );

        let handles = scheduler.start();
        tokio::time::sleep(Duration::from_secs(15)).await;
        stop(&shutdown, handles).await;

        assert!(source.calls() >= 3);
        assert_eq!(store.read(&Symbol::new("BTC")).await.unwrap().price(), 42.0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_both_loops() {
        let source = Arc::new(ScriptedSource::new(0, 1.0));
        let store = Arc::new(InMemorySnapshotRepository::new());
        let shutdown = CancellationToken::new();
        let scheduler = RateScheduler::new(
            config(10, 20),
            Arc::clone(&source),
            store,
            shutdown.clone(),
        );

        let handles = scheduler.start();
        tokio::time::sleep(Duration::from_secs(1)).await;
        stop(&shutdown, handles).await;
        let calls = source.calls();

        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(source.calls(), calls);
    }
}
