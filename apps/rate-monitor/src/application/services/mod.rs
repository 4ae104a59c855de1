//! Application Services
//!
//! Application services coordinate domain logic and infrastructure adapters.
//! They differ from use cases in that they run as background tasks.

mod auto_sender;
mod rate_scheduler;

pub use auto_sender::AutoSender;
pub use rate_scheduler::{RateScheduler, SchedulerConfig};
