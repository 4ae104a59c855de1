//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod errors;
mod monitor_rates;
mod query_rates;
mod refresh_hourly_change;

pub use errors::MonitorError;
pub use monitor_rates::MonitorRatesUseCase;
pub use query_rates::QueryRatesUseCase;
pub use refresh_hourly_change::RefreshHourlyChangeUseCase;
