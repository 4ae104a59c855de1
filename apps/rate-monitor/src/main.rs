//! Rate Monitor Binary
//!
//! Starts the scheduler, the REST API and, when enabled, the chat bot.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin rate-monitor -- [config.yaml]
//! ```
//!
//! # Environment Variables
//!
//! - `RATE_MONITOR_CONFIG`: Config file path when no argument is given (default: config.yaml)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`
//!
//! Any `${VAR}` referenced from the config file, typically `CURRATE_API_KEY`,
//! `DATABASE_URL` and `TELEGRAM_BOT_TOKEN`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rate_monitor::application::services::RateScheduler;
use rate_monitor::application::use_cases::QueryRatesUseCase;
use rate_monitor::config::{Config, load_config};
use rate_monitor::infrastructure::bot::{BotService, TelegramBotAdapter};
use rate_monitor::infrastructure::http::{AppState, create_router};
use rate_monitor::infrastructure::persistence::PostgresSnapshotRepository;
use rate_monitor::infrastructure::quote_source::CurrateQuoteSource;
use rate_monitor::telemetry::init_tracing;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How long background tasks get to finish after the HTTP server stops.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_arg = std::env::args().nth(1);
    let config = load_config(config_arg.as_deref()).context("loading configuration")?;
    init_tracing(&config.observability.logging);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting rate monitor");
    log_config(&config);

    let store = Arc::new(
        PostgresSnapshotRepository::connect(
            &config.persistence.database_url,
            config.persistence.max_connections,
        )
        .await
        .context("connecting to the snapshot store")?,
    );
    store
        .ensure_schema()
        .await
        .context("preparing the snapshot schema")?;

    let quote_source =
        Arc::new(CurrateQuoteSource::new(&config.provider).context("creating the quote source")?);

    let shutdown_token = CancellationToken::new();
    let query = QueryRatesUseCase::new(Arc::clone(&store));

    let scheduler = RateScheduler::new(
        config.scheduler.to_scheduler_config(),
        quote_source,
        Arc::clone(&store),
        shutdown_token.clone(),
    );
    let mut background = scheduler.start();

    if config.bot.enabled {
        background.push(start_bot(&config, query.clone(), shutdown_token.clone())?);
    } else {
        tracing::info!("Chat bot disabled");
    }

    let http_handle = start_http_server(&config, query, shutdown_token.clone()).await?;

    tracing::info!("Rate monitor ready");

    await_shutdown(http_handle, background, shutdown_token).await;

    tracing::info!("Rate monitor stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the loaded configuration, without secrets.
fn log_config(config: &Config) {
    tracing::info!(
        http_address = %config.server.socket_address(),
        provider = %config.provider.base_url,
        symbols = ?config.provider.symbols,
        quote_currency = %config.provider.quote_currency,
        monitor_interval_secs = config.scheduler.monitor_interval_secs,
        hourly_interval_secs = config.scheduler.hourly_interval_secs,
        bot_enabled = config.bot.enabled,
        "Configuration loaded"
    );
}

/// Spawn the chat bot poll loop.
fn start_bot(
    config: &Config,
    query: QueryRatesUseCase<PostgresSnapshotRepository>,
    shutdown: CancellationToken,
) -> anyhow::Result<JoinHandle<()>> {
    let transport =
        Arc::new(TelegramBotAdapter::new(&config.bot).context("creating the Telegram adapter")?);
    let bot = BotService::new(transport, query, shutdown);

    Ok(tokio::spawn(async move { bot.run().await }))
}

/// Start the HTTP server with graceful shutdown support.
async fn start_http_server(
    config: &Config,
    query: QueryRatesUseCase<PostgresSnapshotRepository>,
    shutdown: CancellationToken,
) -> anyhow::Result<JoinHandle<()>> {
    let app = create_router(AppState {
        query,
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    let http_addr = config.server.socket_address();

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /rates");
    tracing::info!("  GET  /rates/{{name}}");
    tracing::info!("  GET  /rates/{{name}}/change");

    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("binding {http_addr}"))?;
    let http_server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(shutdown));

    Ok(tokio::spawn(async move {
        if let Err(e) = http_server.await {
            tracing::error!("HTTP server error: {e}");
        }
    }))
}

/// Wait for the HTTP server to stop, then stop and drain background tasks.
async fn await_shutdown(
    http_handle: JoinHandle<()>,
    background: Vec<JoinHandle<()>>,
    shutdown_token: CancellationToken,
) {
    if let Err(e) = http_handle.await {
        tracing::error!(error = %e, "HTTP server task failed");
    }
    tracing::info!("HTTP server stopped");

    shutdown_token.cancel();
    tracing::info!("Cancellation token triggered for background services");

    let drain = async {
        for handle in background {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Background task failed");
            }
        }
    };
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, drain).await.is_err() {
        tracing::warn!(
            timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
            "Background tasks did not stop in time"
        );
    }
}

/// Wait for SIGINT or SIGTERM, or for another component to cancel.
///
/// If a signal handler cannot be installed, only the other sources can
/// end the wait.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
        () = shutdown.cancelled() => {
            tracing::info!("Shutdown requested");
        }
    }

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}
