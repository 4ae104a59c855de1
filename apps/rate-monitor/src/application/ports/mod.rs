//! Application Ports (Driver and Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! - **Driver Ports** (Primary/Inbound): How the world uses our application
//! - **Driven Ports** (Secondary/Outbound): How our application uses external systems

mod chat_transport_port;
mod quote_source_port;

pub use chat_transport_port::{BotError, ChatId, ChatTransport, IncomingMessage};
#[cfg(test)]
pub use quote_source_port::MockQuoteSourcePort;
pub use quote_source_port::{FetchError, QuoteSourcePort, RawQuotes, parse_price};
