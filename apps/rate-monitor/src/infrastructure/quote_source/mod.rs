//! Quote Source Adapters
//!
//! Implementations of `QuoteSourcePort`.

mod currate;

pub use currate::CurrateQuoteSource;
