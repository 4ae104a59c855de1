//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**: Implement ports for external systems
//!   - `persistence/`: Snapshot store adapters (PostgreSQL, in-memory)
//!   - `quote_source/`: Pricing provider adapters
//!
//! - **Driver Adapters (Inbound)**: Expose application to external world
//!   - `http/`: REST API controllers
//!   - `bot/`: Chat bot over the Telegram Bot API

pub mod bot;
pub mod http;
pub mod persistence;
pub mod quote_source;
