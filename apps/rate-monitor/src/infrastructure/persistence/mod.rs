//! Persistence Adapters
//!
//! Database implementations of repository traits.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemorySnapshotRepository;
pub use postgres::PostgresSnapshotRepository;
