//! Aggregate store errors.

use std::fmt;

use crate::domain::shared::Symbol;

/// Store operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Open the connection pool.
    Connect,
    /// Create the backing schema.
    EnsureSchema,
    /// Read every snapshot.
    ReadAll,
    /// Read one snapshot.
    Read,
    /// Batch insert-or-update.
    UpsertMany,
    /// Read the hourly change for one symbol.
    ReadChangePerHour,
}

impl StoreOperation {
    /// Stable operation name for logs and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::EnsureSchema => "ensure_schema",
            Self::ReadAll => "read_all",
            Self::Read => "read",
            Self::UpsertMany => "upsert_many",
            Self::ReadChangePerHour => "read_change_per_hour",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the aggregate store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No snapshot exists for the symbol.
    NotFound {
        /// Requested symbol.
        symbol: Symbol,
    },

    /// The backing store failed.
    Persist {
        /// Operation that failed.
        operation: StoreOperation,
        /// Symbol involved, if the operation targets one.
        symbol: Option<Symbol>,
        /// Underlying cause.
        message: String,
    },
}

impl StoreError {
    /// Build a `Persist` error.
    pub fn persist(
        operation: StoreOperation,
        symbol: Option<&Symbol>,
        message: impl Into<String>,
    ) -> Self {
        Self::Persist {
            operation,
            symbol: symbol.cloned(),
            message: message.into(),
        }
    }

    /// Whether this is a `NotFound` error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { symbol } => write!(f, "Snapshot not found: {symbol}"),
            Self::Persist {
                operation,
                symbol: Some(symbol),
                message,
            } => write!(f, "Store {operation} failed for {symbol}: {message}"),
            Self::Persist {
                operation,
                symbol: None,
                message,
            } => write!(f, "Store {operation} failed: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}
