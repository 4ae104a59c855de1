//! Tick interval configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::services::SchedulerConfig;

/// Periodic trigger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// Seconds between monitor ticks.
    #[serde(default = "default_monitor_interval")]
    pub monitor_interval_secs: u64,
    /// Seconds between hourly-change ticks.
    #[serde(default = "default_hourly_interval")]
    pub hourly_interval_secs: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            monitor_interval_secs: default_monitor_interval(),
            hourly_interval_secs: default_hourly_interval(),
        }
    }
}

impl SchedulerSettings {
    /// Convert to the scheduler's runtime configuration.
    #[must_use]
    pub const fn to_scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            monitor_interval: Duration::from_secs(self.monitor_interval_secs),
            hourly_interval: Duration::from_secs(self.hourly_interval_secs),
        }
    }
}

const fn default_monitor_interval() -> u64 {
    60
}

const fn default_hourly_interval() -> u64 {
    3600
}
