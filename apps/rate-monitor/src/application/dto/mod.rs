//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for API boundaries and use case inputs/outputs.

mod rate_dto;
mod rate_message;

pub use rate_dto::{ChangePerHourDto, RateDto};
pub use rate_message::{NO_RATES_REPLY, STORE_FAILURE_REPLY, format_rate, format_rates};
