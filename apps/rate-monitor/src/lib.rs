// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::type_complexity
    )
)]

//! Rate Monitor - Core Library
//!
//! Polls a pricing provider, keeps one aggregated snapshot per tracked
//! currency (running min/max, hourly change), and serves the snapshots over
//! REST and a chat bot.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `rate_aggregation`: Snapshot entity, aggregation rules, store contract
//!   - `shared`: Symbol, Timestamp, SnapshotId value objects
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `QuoteSourcePort`, `ChatTransport`
//!   - `use_cases`: `MonitorRates`, `RefreshHourlyChange`, `QueryRates`
//!   - `services`: `RateScheduler`, `AutoSender`
//!   - `dto`: JSON bodies and chat message formatting
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `quote_source`: currate.ru HTTP adapter
//!   - `persistence`: Snapshot store (`PostgreSQL`, in-memory)
//!   - `http`: REST API
//!   - `bot`: Telegram chat bot

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// YAML configuration loading.
pub mod config;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::rate_aggregation::{
    RateAggregator, Snapshot, SnapshotRepository, StoreError, StoreOperation,
};
pub use domain::shared::{SnapshotId, Symbol, Timestamp};

pub use application::ports::{ChatTransport, FetchError, QuoteSourcePort, RawQuotes};
pub use application::services::{AutoSender, RateScheduler, SchedulerConfig};
pub use application::use_cases::{
    MonitorRatesUseCase, QueryRatesUseCase, RefreshHourlyChangeUseCase,
};

pub use infrastructure::bot::{BotService, TelegramBotAdapter};
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::persistence::{InMemorySnapshotRepository, PostgresSnapshotRepository};
pub use infrastructure::quote_source::CurrateQuoteSource;
